//! 画像生成プロンプトのドメイン型
//!
//! Prompt = sanitize(title + " " + content)。長さの上限は設けない。

use regex::Regex;
use std::sync::OnceLock;

/// 投稿から取り出した生成リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub title: String,
    pub content: String,
}

impl GenerationRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// サニタイズ済みプロンプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self(sanitize(&format!("{} {}", request.title, request.content)))
    }
}

impl std::ops::Deref for Prompt {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")
            .expect("static pattern")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static pattern"))
}

/// マークアップと制御文字を取り除き、空白を 1 つに畳んで前後を削る
///
/// `<script>` / `<style>` は中身ごと消す。それ以外のタグはタグだけ消して中のテキストを残す。
pub fn sanitize(input: &str) -> String {
    let without_scripts = script_re().replace_all(input, " ");
    let without_tags = tag_re().replace_all(&without_scripts, " ");
    let printable: String = without_tags
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_joins_title_and_content() {
        let req = GenerationRequest::new("Sunset", "A photo of a sunset over mountains");
        let prompt = Prompt::from_request(&req);
        assert_eq!(&*prompt, "Sunset A photo of a sunset over mountains");
    }

    #[test]
    fn test_sanitize_strips_script_with_content() {
        let s = sanitize("Hello <script type=\"text/javascript\">alert('x')</script>world");
        assert_eq!(s, "Hello world");
        let s = sanitize("a<STYLE>body{color:red}</STYLE>b");
        assert_eq!(s, "a b");
    }

    #[test]
    fn test_sanitize_strips_markup_keeps_text() {
        let s = sanitize("<p>A <strong>bold</strong> move</p>\n<!-- wp:paragraph -->");
        assert_eq!(s, "A bold move");
    }

    #[test]
    fn test_sanitize_removes_control_chars_and_collapses_whitespace() {
        let s = sanitize("  line1\r\n\tline2\u{0007}  end  ");
        assert_eq!(s, "line1 line2 end");
    }

    #[test]
    fn test_prompt_sanitizes_the_concatenation() {
        let req = GenerationRequest::new("<b>Title</b>", "<script>x()</script>Body");
        assert_eq!(&*Prompt::from_request(&req), "Title Body");
    }

    #[test]
    fn test_sanitize_does_not_cap_length() {
        let long = "word ".repeat(5000);
        assert_eq!(sanitize(&long).len(), "word ".len() * 5000 - 1);
    }
}
