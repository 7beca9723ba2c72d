//! Main-content extraction from fetched HTML.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::{
    analysis::{lexical::count_words, normalize::clean_text_with, ExtractedContent, Heading, PageSignals},
    config::AnalysisConfig,
};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Failed to compile selector")
}

/// Regions that never count as content.
static NOISE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    selector(
        "script, style, nav, header, footer, .nav, .header, .footer, .sidebar, .menu, .ad, .advertisement",
    )
});

/// Tried in order, the first region with text wins.
static CONTENT_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "main",
        "article",
        ".content",
        ".post",
        ".entry",
        "#content",
        "#main",
        ".main-content",
        ".post-content",
        ".article-content",
    ]
    .into_iter()
    .map(selector)
    .collect()
});

static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("h1, h2, h3, h4, h5, h6"));
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("title"));
static OG_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static OG_DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static OG_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:image"]"#));
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("body"));
static VIDEO_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("video"));
static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("img"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPage {
    pub content: ExtractedContent,
    pub signals: PageSignals,
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| element_text(&el).trim().to_string())
        .filter(|text| !text.is_empty())
}

fn first_content_attr(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
}

fn heading_level(name: &str) -> u8 {
    name.strip_prefix('h')
        .and_then(|level| level.parse().ok())
        .unwrap_or(1)
}

fn collect_headings(regions: &[ElementRef], max_headings: usize) -> Vec<Heading> {
    regions
        .iter()
        .flat_map(|region| region.select(&HEADING_SELECTOR))
        .map(|el| Heading {
            level: heading_level(el.value().name()),
            text: clean_text_with(&element_text(&el), usize::MAX),
        })
        .take(max_headings)
        .collect()
}

/// Detach every noise region from the tree.
fn strip_noise(document: &mut Html) {
    let noise: Vec<_> = document.select(&NOISE_SELECTOR).map(|el| el.id()).collect();

    for id in noise {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Text and headings of the first content region that has any text,
/// falling back to the whole body.
fn main_region(document: &Html, config: &AnalysisConfig) -> (String, Vec<Heading>) {
    for selector in CONTENT_SELECTORS.iter() {
        let regions: Vec<ElementRef> = document.select(selector).collect();
        if regions.is_empty() {
            continue;
        }

        let raw = regions.iter().map(element_text).collect::<Vec<_>>().join(" ");
        let text = clean_text_with(&raw, config.max_text_length);
        if !text.is_empty() {
            return (text, collect_headings(&regions, config.max_headings));
        }
    }

    log::debug!("no content region matched, using body");

    let body: Vec<ElementRef> = document.select(&BODY_SELECTOR).collect();
    let raw = if body.is_empty() {
        element_text(&document.root_element())
    } else {
        body.iter().map(element_text).collect::<Vec<_>>().join(" ")
    };

    (
        clean_text_with(&raw, config.max_text_length),
        collect_headings(&body, config.max_headings),
    )
}

/// Pull metadata, main text and structural hints out of an HTML document.
///
/// Never fails: unparseable or empty documents produce empty content.
pub fn extract_page(html: &str, config: &AnalysisConfig) -> ExtractedPage {
    let mut document = Html::parse_document(html);

    let title = first_text(&document, &TITLE_SELECTOR)
        .or_else(|| first_content_attr(&document, &OG_TITLE_SELECTOR))
        .unwrap_or_default();
    let description = first_content_attr(&document, &DESCRIPTION_SELECTOR)
        .or_else(|| first_content_attr(&document, &OG_DESCRIPTION_SELECTOR))
        .unwrap_or_default();
    let hero_image_url = first_content_attr(&document, &OG_IMAGE_SELECTOR).unwrap_or_default();

    strip_noise(&mut document);

    let signals = PageSignals {
        video_count: document.select(&VIDEO_SELECTOR).count(),
        image_count: document.select(&IMAGE_SELECTOR).count(),
    };

    let (main_text, headings) = main_region(&document, config);

    ExtractedPage {
        content: ExtractedContent {
            title,
            description,
            hero_image_url,
            word_count: count_words(&main_text),
            main_text,
            headings,
        },
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> ExtractedPage {
        extract_page(html, &AnalysisConfig::default())
    }

    #[test]
    fn test_metadata_fallback_order() {
        let page = extract(
            r#"<html><head>
                <title>Title Tag</title>
                <meta property="og:title" content="OG Title">
                <meta property="og:description" content="OG description">
                <meta property="og:image" content="https://img.example.com/hero.png">
            </head><body><p>hello</p></body></html>"#,
        );

        assert_eq!(page.content.title, "Title Tag");
        assert_eq!(page.content.description, "OG description");
        assert_eq!(page.content.hero_image_url, "https://img.example.com/hero.png");
    }

    #[test]
    fn test_og_title_used_without_title_tag() {
        let page = extract(
            r#"<html><head>
                <meta property="og:title" content="OG Title">
                <meta name="description" content="Plain description">
                <meta property="og:description" content="OG description">
            </head><body></body></html>"#,
        );

        assert_eq!(page.content.title, "OG Title");
        assert_eq!(page.content.description, "Plain description");
    }

    #[test]
    fn test_main_region_wins_over_body() {
        let page = extract(
            r#"<html><body>
                <nav>Home | About | Contact</nav>
                <div class="intro">Outside text</div>
                <main>
                    <h1>Main heading</h1>
                    <p>The   real
                    content lives here.</p>
                </main>
                <footer>Copyright</footer>
            </body></html>"#,
        );

        assert_eq!(page.content.main_text, "Main heading The real content lives here.");
        assert_eq!(page.content.word_count, 7);
        assert_eq!(
            page.content.headings,
            vec![Heading {
                level: 1,
                text: "Main heading".to_string()
            }]
        );
    }

    #[test]
    fn test_selector_priority() {
        let page = extract(
            r#"<html><body>
                <div id="content">Id content</div>
                <article>Article content</article>
            </body></html>"#,
        );
        assert_eq!(page.content.main_text, "Article content");
    }

    #[test]
    fn test_empty_region_is_skipped() {
        let page = extract(
            r#"<html><body>
                <main>   </main>
                <div class="post">Post body text</div>
            </body></html>"#,
        );
        assert_eq!(page.content.main_text, "Post body text");
    }

    #[test]
    fn test_body_fallback_strips_noise() {
        let page = extract(
            r#"<html><head><style>body { color: red; }</style></head><body>
                <header>Site header</header>
                <script>var tracking = true;</script>
                <div class="sidebar">Links</div>
                <div class="ad">Buy now</div>
                <p>Only this remains</p>
            </body></html>"#,
        );
        assert_eq!(page.content.main_text, "Only this remains");
    }

    #[test]
    fn test_headings_limited_and_ordered() {
        let headings: String = (1..=8).map(|i| format!("<h2>Section {i}</h2><p>text</p>")).collect();
        let page = extract(&format!("<html><body><article><h1>Top</h1>{headings}</article></body></html>"));

        assert_eq!(page.content.headings.len(), 5);
        assert_eq!(page.content.headings[0].level, 1);
        assert_eq!(page.content.headings[0].text, "Top");
        assert_eq!(page.content.headings[4].text, "Section 4");
        assert_eq!(page.content.headings[4].level, 2);
    }

    #[test]
    fn test_structural_signals() {
        let images: String = (0..6).map(|i| format!(r#"<img src="{i}.png">"#)).collect();
        let page = extract(&format!(
            r#"<html><body><main><video src="a.mp4"></video>{images}</main></body></html>"#
        ));
        assert_eq!(page.signals.video_count, 1);
        assert_eq!(page.signals.image_count, 6);
    }

    #[test]
    fn test_text_is_capped() {
        let body = "lorem ".repeat(3000);
        let page = extract(&format!("<html><body><main>{body}</main></body></html>"));
        assert_eq!(page.content.main_text.chars().count(), 5000);
    }

    #[test]
    fn test_garbage_input() {
        let page = extract("");
        assert_eq!(page.content, ExtractedContent::default());

        let page = extract("<<<>>> not really html");
        assert!(page.content.title.is_empty());
    }
}
