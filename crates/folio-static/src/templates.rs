//! Template engine for rendering portfolio pages.

use minijinja::{context, Environment};

use folio_content::{WorkEntry, WorkPage};

/// Site-wide values shared by every page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SiteContext {
    /// Site title
    pub title: String,
    /// Site description for the list page
    pub description: String,
    /// Base URL for links, ends with `/`
    pub base_url: String,
    /// Absolute origin used in social metadata
    pub site_url: String,
    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
    /// Include the live reload client
    pub live_reload: bool,
}

impl Default for SiteContext {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            base_url: "/".to_string(),
            site_url: "http://localhost:7777".to_string(),
            styles: vec![],
            live_reload: false,
        }
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)
            .expect("Failed to add base template");
        env.add_template("list.html", LIST_TEMPLATE)
            .expect("Failed to add list template");
        env.add_template("work.html", WORK_TEMPLATE)
            .expect("Failed to add work template");
        env.add_template("not_found.html", NOT_FOUND_TEMPLATE)
            .expect("Failed to add not found template");

        Self { env }
    }

    /// Render the work list page.
    pub fn render_list(
        &self,
        site: &SiteContext,
        works: &[WorkEntry],
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("list.html")?.render(context! {
            site => site,
            title => &site.title,
            works => works,
        })
    }

    /// Render a work detail page.
    pub fn render_work(
        &self,
        site: &SiteContext,
        page: &WorkPage,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("work.html")?.render(context! {
            site => site,
            title => &page.social.title,
            page => page,
            social => &page.social,
        })
    }

    /// Render the page shown for an unknown slug.
    pub fn render_not_found(
        &self,
        site: &SiteContext,
        slug: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("not_found.html")?.render(context! {
            site => site,
            title => "Not found",
            slug => slug,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title != site.title %}{{ title }} - {% endif %}{{ site.title }}</title>
  {% block meta %}{% endblock %}
  {% for style in site.styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}<link rel="stylesheet" href="{{ site.base_url }}assets/main.css">
</head>
<body>
  <header class="site-header">
    <a href="{{ site.base_url }}" class="site-title">{{ site.title }}</a>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  {% if site.live_reload %}<script src="/__reload.js"></script>{% endif %}
</body>
</html>"##;

const LIST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block meta %}
  {% if site.description %}<meta name="description" content="{{ site.description }}">{% endif %}
{% endblock %}

{% block content %}
<section class="works">
  {% for work in works %}
  <a class="work-card" href="{{ site.base_url }}work/{{ work.slug | urlencode }}/">
    <h2 class="work-title">{{ work.title }}</h2>
    {% if work.date %}<p class="work-date">{{ work.date }}</p>{% endif %}
    {% if work.body.kind == "image" %}
    <img class="work-thumb" src="{{ work.body.src }}" alt="{{ work.body.alt }}" loading="lazy">
    {% elif work.body.kind == "bullets" %}
    <ul class="work-bullets">
      {% for item in work.body.items %}<li>{{ item }}</li>{% endfor %}
    </ul>
    {% elif work.body.text %}
    <p class="work-snippet">{{ work.body.text }}</p>
    {% endif %}
  </a>
  {% else %}
  <p class="empty">Nothing here yet.</p>
  {% endfor %}
</section>
{% endblock %}"##;

const WORK_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block meta %}
  <meta name="description" content="{{ social.description }}">
  <meta property="og:title" content="{{ social.title }}">
  <meta property="og:description" content="{{ social.description }}">
  <meta property="og:type" content="{{ social.type }}">
  <meta property="og:url" content="{{ social.url }}">
  {% if social.image %}<meta property="og:image" content="{{ social.image }}">{% endif %}
  <meta name="twitter:card" content="{% if social.image %}summary_large_image{% else %}summary{% endif %}">
  <meta name="twitter:title" content="{{ social.title }}">
  <meta name="twitter:description" content="{{ social.description }}">
  {% if social.image %}<meta name="twitter:image" content="{{ social.image }}">{% endif %}
  <link rel="canonical" href="{{ social.url }}">
{% endblock %}

{% block content %}
<article class="work">
  <a class="back" href="{{ site.base_url }}">&larr; All work</a>
  {% if page.meta.date %}<p class="work-date">{{ page.meta.date }}</p>{% endif %}
  <div class="content">
    {{ page.html | safe }}
  </div>
</article>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="not-found">
  <h1>Not found</h1>
  {% if slug %}<p>There is no work called <code>{{ slug }}</code>.</p>
  {% else %}<p>This page does not exist.</p>{% endif %}
  <a href="{{ site.base_url }}">Back to all work</a>
</section>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::{load_work_page, BundleSource};
    use folio_md::{ImageRef, Preview};

    // minijinja escapes `/` in interpolated values
    fn unescape_slashes(html: String) -> String {
        html.replace("&#x2f;", "/")
    }

    fn site() -> SiteContext {
        SiteContext {
            title: "Jane Doe".to_string(),
            site_url: "https://jane.example".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn renders_each_preview_kind() {
        let engine = TemplateEngine::new();
        let works = vec![
            WorkEntry {
                slug: "lamp".to_string(),
                title: "Desk Lamp".to_string(),
                date: "2022".to_string(),
                body: Preview::Image(ImageRef {
                    src: "/static/lamp.jpg".to_string(),
                    alt: "Lamp".to_string(),
                }),
            },
            WorkEntry {
                slug: "firmware".to_string(),
                title: "Firmware".to_string(),
                date: String::new(),
                body: Preview::Bullets {
                    items: vec!["Bootloader".to_string(), "OTA updates".to_string()],
                },
            },
            WorkEntry {
                slug: "notes".to_string(),
                title: "Notes".to_string(),
                date: String::new(),
                body: Preview::text("Short & sweet"),
            },
        ];

        let html = unescape_slashes(engine.render_list(&site(), &works).unwrap());

        assert!(html.contains("<title>Jane Doe</title>"));
        assert!(html.contains(r#"href="/work/lamp/""#));
        assert!(html.contains(r#"src="/static/lamp.jpg""#));
        assert!(html.contains("<li>OTA updates</li>"));
        assert!(html.contains("Short &amp; sweet"));
        assert!(html.contains("2022"));
    }

    #[test]
    fn renders_empty_list() {
        let html = TemplateEngine::new().render_list(&site(), &[]).unwrap();

        assert!(html.contains("Nothing here yet."));
    }

    #[test]
    fn renders_social_meta() {
        let source = BundleSource::new().with_file(
            "work/kiln.md",
            "---\ntitle: Kiln\ndate: 2023\n---\n![Kiln](/static/kiln.jpg)\n\nA PID controlled kiln.",
        );
        let page = load_work_page(&source, "kiln", "https://jane.example")
            .unwrap()
            .unwrap();

        let html = unescape_slashes(TemplateEngine::new().render_work(&site(), &page).unwrap());

        assert!(html.contains("<title>Kiln - Jane Doe</title>"));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"content="https://jane.example/static/kiln.jpg""#));
        assert!(html.contains(r#"content="https://jane.example/work/kiln""#));
        assert!(html.contains("summary_large_image"));
        assert!(html.contains("<p>A PID controlled kiln.</p>"));
    }

    #[test]
    fn renders_not_found() {
        let html = TemplateEngine::new()
            .render_not_found(&site(), "<nope>")
            .unwrap();

        assert!(html.contains("Not found"));
        assert!(html.contains("&lt;nope&gt;"));
    }

    #[test]
    fn renders_generic_not_found_without_slug() {
        let html = TemplateEngine::new().render_not_found(&site(), "").unwrap();

        assert!(html.contains("This page does not exist."));
        assert!(!html.contains("<code>"));
    }

    #[test]
    fn includes_live_reload_script_when_enabled() {
        let engine = TemplateEngine::new();
        let mut site = site();

        assert!(!engine.render_list(&site, &[]).unwrap().contains("__reload.js"));

        site.live_reload = true;
        assert!(engine.render_list(&site, &[]).unwrap().contains("/__reload.js"));
    }
}
