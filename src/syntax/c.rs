//! Node-kind vocabulary tree-sitter-c produces, classified into the
//! builder's closed `Construct` set. See spec §6 for the exact kind list
//! this crate contracts against.

use phf::{Map, phf_map};

use super::kinds::Construct;

pub static KINDS: Map<&'static str, Construct> = phf_map! {
    "function_definition"   => Construct::FunctionDef,
    "compound_statement"    => Construct::Block,

    "expression_statement"  => Construct::Linear,
    "declaration"            => Construct::Linear,

    "if_statement"           => Construct::If,
    "while_statement"        => Construct::While,
    "do_statement"           => Construct::DoWhile,
    "for_statement"          => Construct::For,

    "break_statement"        => Construct::Break,
    "continue_statement"     => Construct::Continue,
    "return_statement"       => Construct::Return,

    "switch_statement"       => Construct::Switch,
    "case_statement"         => Construct::Case,

    "labeled_statement"      => Construct::Labeled,
    "goto_statement"         => Construct::Goto,

    "call_expression"        => Construct::Call,

    // trivia
    ";" => Construct::Trivia,
    "," => Construct::Trivia,
    "(" => Construct::Trivia,
    ")" => Construct::Trivia,
    "{" => Construct::Trivia,
    "}" => Construct::Trivia,
    "comment" => Construct::Trivia,
    "preproc_include" => Construct::Trivia,
    "preproc_def" => Construct::Trivia,
};
