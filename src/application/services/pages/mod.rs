use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct RenderedPage {
    pub title: Option<String>,
    pub html: String,
}

/// Page names map straight onto file names, so only a conservative charset passes.
pub fn is_valid_page_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn render_page(text: &str) -> anyhow::Result<RenderedPage> {
    let mut c_opts = comrak::ComrakOptions::default();
    c_opts.parse.smart = false;
    c_opts.extension.table = true;
    c_opts.extension.autolink = true;
    c_opts.extension.strikethrough = true;
    c_opts.extension.tasklist = true;
    c_opts.render.github_pre_lang = true;
    // Raw HTML passes through comrak and is cleaned by ammonia below
    c_opts.render.unsafe_ = true;

    let html = comrak::markdown_to_html(text, &c_opts);

    let mut builder = ammonia::Builder::default();
    builder.add_generic_attributes(["class", "id", "title"]);
    builder.add_tags(["input"]);
    builder.add_tag_attributes("input", ["type", "checked", "disabled"]);
    builder.url_relative(ammonia::UrlRelative::PassThrough);
    builder.link_rel(Some("noopener noreferrer"));
    let safe_html = builder.clean(&html).to_string();

    Ok(RenderedPage {
        title: first_heading(text),
        html: safe_html,
    })
}

fn first_heading(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find_map(|l| l.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_reject_traversal() {
        assert!(is_valid_page_name("about"));
        assert!(is_valid_page_name("terms_of-use2"));
        assert!(!is_valid_page_name("../secret"));
        assert!(!is_valid_page_name("a/b"));
        assert!(!is_valid_page_name(""));
        assert!(!is_valid_page_name("about.md"));
    }

    #[test]
    fn renders_markdown_and_strips_scripts() {
        let page = render_page("# About us\n\nHello **world**<script>alert(1)</script>").unwrap();
        assert_eq!(page.title.as_deref(), Some("About us"));
        assert!(page.html.contains("<strong>world</strong>"));
        assert!(!page.html.contains("<script"));
    }

    #[test]
    fn title_is_optional() {
        let page = render_page("just text").unwrap();
        assert!(page.title.is_none());
    }
}
