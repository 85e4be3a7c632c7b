/// A split-pair content file: a markdown heading holding the display name,
/// then the free-text description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleDoc {
    pub title: String,
    pub body: String,
}

/// Extract the title from the first heading line and the trimmed remainder
/// as the body. A file with no heading yields an empty title and the whole
/// trimmed text as body.
pub fn parse_title_doc(text: &str) -> TitleDoc {
    let mut title = String::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut found_title = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if !found_title && trimmed.starts_with('#') {
            found_title = true;
            title = trimmed.trim_start_matches('#').trim().to_string();
            continue;
        }
        body_lines.push(line);
    }

    TitleDoc {
        title,
        body: body_lines.join("\n").trim().to_string(),
    }
}

/// Emit `# <title>`, a blank line, and the body.
pub fn serialize_title_doc(title: &str, body: &str) -> String {
    if body.is_empty() {
        format!("# {title}\n")
    } else {
        format!("# {title}\n\n{body}\n")
    }
}
