//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Split a rendered tree line into its branch prefix, checkbox marker and label.
///
/// The marker is only recognized directly after the branch drawing, so brackets
/// inside a caption are never mistaken for it.
fn split_marker(line: &str) -> (&str, &str, &str) {
    let body = line.trim_start_matches(|c: char| matches!(c, '│' | '├' | '└' | '─' | ' '));
    let prefix = &line[..line.len() - body.len()];
    match ["[x]", "[ ]", "[-]"].into_iter().find(|m| body.starts_with(m)) {
        Some(marker) => (prefix, marker, &body[marker.len()..]),
        None => (prefix, "", body),
    }
}

/// Print a rendered tree line, coloring its checkbox marker
pub fn tree_line(line: &str) {
    let (prefix, marker, label) = split_marker(line);
    let marker = match marker {
        "[x]" => marker.green().to_string(),
        "[-]" => marker.yellow().to_string(),
        _ => marker.to_string(),
    };
    println!("{}{}{}", prefix, marker, label);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("[x] course/", "", "[x]", " course/")]
    #[case("├── [-] Chapter 2/", "├── ", "[-]", " Chapter 2/")]
    #[case("│   └── [ ] odd [-] name", "│   └── ", "[ ]", " odd [-] name")]
    #[case("└── [ ] [x] twice", "└── ", "[ ]", " [x] twice")]
    #[case("Empty tree", "", "", "Empty tree")]
    fn test_split_marker(
        #[case] line: &str,
        #[case] prefix: &str,
        #[case] marker: &str,
        #[case] label: &str,
    ) {
        assert_eq!(split_marker(line), (prefix, marker, label));
    }
}
