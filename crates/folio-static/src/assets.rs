//! Stylesheet generation and minification.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main CSS file, minified when requested.
    ///
    /// Falls back to the unminified stylesheet if minification fails.
    pub fn main_css(minify: bool) -> String {
        let css = Self::generate_css();
        if !minify {
            return css;
        }

        match Self::minify_css(&css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Serving unminified CSS: {}", e);
                css
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* Folio portfolio theme */

:root {
  --background: #fafaf9;
  --foreground: #1c1917;
  --muted: #78716c;
  --border: #e7e5e4;
  --accent: #b45309;
  --card: #ffffff;
  --radius: 0.75rem;
  --content-max-width: 960px;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #0c0a09;
    --foreground: #f5f5f4;
    --muted: #a8a29e;
    --border: #292524;
    --accent: #f59e0b;
    --card: #1c1917;
  }
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.site-header {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem 1.5rem 1rem;
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 1rem 1.5rem 4rem;
}

/* Work list */
.works {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
  gap: 1.5rem;
}

.work-card {
  display: flex;
  flex-direction: column;
  gap: 0.5rem;
  padding: 1.25rem;
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  color: inherit;
  text-decoration: none;
  transition: border-color 0.15s, transform 0.15s;
}

.work-card:hover {
  border-color: var(--accent);
  transform: translateY(-2px);
}

.work-title {
  font-size: 1.125rem;
}

.work-date {
  font-size: 0.875rem;
  color: var(--muted);
}

.work-thumb {
  width: 100%;
  aspect-ratio: 16 / 10;
  object-fit: cover;
  border-radius: calc(var(--radius) / 2);
}

.work-bullets {
  padding-left: 1.25rem;
  display: -webkit-box;
  -webkit-line-clamp: 5;
  -webkit-box-orient: vertical;
  overflow: hidden;
}

.work-snippet {
  color: var(--muted);
}

.empty {
  color: var(--muted);
}

/* Work detail */
.work .back {
  display: inline-block;
  margin-bottom: 1rem;
  color: var(--accent);
  text-decoration: none;
}

.content {
  max-width: 720px;
}

.content h1,
.content h2,
.content h3 {
  margin: 2rem 0 0.75rem;
  line-height: 1.25;
}

.content p,
.content ul,
.content ol,
.content pre,
.content blockquote {
  margin-bottom: 1rem;
}

.content ul,
.content ol {
  padding-left: 1.5rem;
}

.content img {
  max-width: 100%;
  border-radius: calc(var(--radius) / 2);
}

.content a {
  color: var(--accent);
}

.content blockquote {
  border-left: 3px solid var(--border);
  padding-left: 1rem;
  color: var(--muted);
}

.content pre {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: calc(var(--radius) / 2);
  padding: 1rem;
  overflow-x: auto;
}

.content code {
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  font-size: 0.875em;
}

.not-found {
  text-align: center;
  padding: 4rem 0;
}

.not-found a {
  color: var(--accent);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();

        assert!(css.contains(".work-card"));
        assert!(css.contains("--accent"));
    }

    #[test]
    fn minifies_css() {
        let css = "body {\n  color: red;\n}\n";

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(minified.len() < css.len());
        assert!(!minified.contains('\n'));
    }

    #[test]
    fn main_css_minifies_default_theme() {
        let full = AssetPipeline::main_css(false);
        let minified = AssetPipeline::main_css(true);

        assert_eq!(full, AssetPipeline::generate_css());
        assert!(minified.len() < full.len());
    }
}
