//! Prompt templates for the four model requests

use crate::pipeline::types::CommonDimensions;

pub fn classification_prompt(readme: &str) -> String {
    format!(
        r#"You are given the README of a software project. Decide whether the project is a
zero-knowledge proof (ZKP) project. Answer 'yes' if it is a ZKP project, otherwise answer 'no'.
readme_content: {readme}
"#
    )
}

pub fn mining_prompt(readme: &str, count: usize) -> String {
    format!(
        r#"You are given the README of a software project. Extract {count} dimensions from this
README that could be used to compare the project with other projects.
readme_content: {readme}
"#
    )
}

pub fn reconcile_prompt(combined_dimensions: &str, count: usize) -> String {
    format!(
        r#"From this list of dimensions, identify {count} common dimensions which can be used to
compare the various projects.
list_of_dimensions: {combined_dimensions}
"#
    )
}

pub fn extraction_prompt(readme: &str, count: usize, agreed: &CommonDimensions) -> String {
    format!(
        r#"Extract these {count} dimensions from the README below and summarise each one.
dimensions: {dimensions}
readme_content: {readme}
"#,
        dimensions = agreed.to_json()
    )
}
