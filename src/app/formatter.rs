use crate::app::models::TreeLine;

pub struct OutputGenerator;

impl OutputGenerator {
    /// Joins the lines with `\n`. No trailing newline.
    pub fn generate_tree(lines: &[TreeLine]) -> String {
        lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Wraps the tree in a plain-text code fence, ready to paste into markdown.
    pub fn fenced(tree: &str) -> String {
        format!("```text\n{}\n```", tree)
    }
}
