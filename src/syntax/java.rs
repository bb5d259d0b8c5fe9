//! Node-kind vocabulary tree-sitter-java produces. Per Open Question (a) in
//! spec §9, `switch_expression` and `switch_statement` are synonyms here:
//! both classify to `Construct::Switch` and are walked identically.

use phf::{Map, phf_map};

use super::kinds::Construct;

pub static KINDS: Map<&'static str, Construct> = phf_map! {
    "method_declaration"              => Construct::FunctionDef,
    "block"                           => Construct::Block,

    "expression_statement"           => Construct::Linear,
    "local_variable_declaration"     => Construct::Linear,

    "if_statement"                   => Construct::If,
    "while_statement"                => Construct::While,
    "do_statement"                   => Construct::DoWhile,
    "for_statement"                  => Construct::For,
    "enhanced_for_statement"         => Construct::EnhancedFor,

    "break_statement"                => Construct::Break,
    "continue_statement"             => Construct::Continue,
    "return_statement"               => Construct::Return,

    "switch_expression"              => Construct::Switch,
    "switch_statement"               => Construct::Switch,
    "switch_block_statement_group"   => Construct::Case,
    "switch_rule"                    => Construct::Case,

    "labeled_statement"              => Construct::Labeled,

    "method_invocation"              => Construct::Call,

    // trivia
    ";" => Construct::Trivia,
    "," => Construct::Trivia,
    "(" => Construct::Trivia,
    ")" => Construct::Trivia,
    "{" => Construct::Trivia,
    "}" => Construct::Trivia,
    "line_comment" => Construct::Trivia,
    "block_comment" => Construct::Trivia,
    "import_declaration" => Construct::Trivia,
    "package_declaration" => Construct::Trivia,
};
