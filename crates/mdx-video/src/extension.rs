//! Video extension and its pulldown-cmark integration.

use std::collections::VecDeque;

use mdx_video_config::VideoConfig;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::chain::{RuleChain, Segment};
use crate::error::EmbedError;
use crate::site::{EmbedPattern, VideoSite};

/// Markdown extension that replaces bare Youku and Tudou URLs with embedded
/// flash players.
///
/// The configuration and rule chain are fixed at construction, so a single
/// extension can render any number of documents, including from several
/// threads at once.
///
/// # Example
///
/// ```
/// use mdx_video::VideoExtension;
/// use mdx_video_config::VideoConfig;
///
/// let extension = VideoExtension::new(VideoConfig::default()).unwrap();
/// let html = extension.render("http://www.tudou.com/programs/view/6K89f_CqbYw/");
/// assert!(html.contains(r#"data="http://www.tudou.com/v/6K89f_CqbYw/v.swf""#));
/// ```
#[derive(Clone, Debug)]
pub struct VideoExtension {
    config: VideoConfig,
    chain: RuleChain,
    options: Options,
}

impl VideoExtension {
    /// Create the extension and install its rules.
    pub fn new(config: VideoConfig) -> Result<Self, EmbedError> {
        let mut chain = RuleChain::new();
        for site in VideoSite::ALL {
            site.register(&mut chain)?;
        }
        Ok(Self {
            config,
            chain,
            options: Options::empty(),
        })
    }

    /// Parser options used by [`render`](Self::render).
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Install the Youku and Tudou rules into `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::DuplicateRule`] if the chain already has either rule.
    pub fn extend(&self, chain: &mut RuleChain) -> Result<(), EmbedError> {
        for site in VideoSite::ALL {
            site.register(chain)?;
        }
        Ok(())
    }

    /// Resolved configuration.
    #[must_use]
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Installed rules.
    #[must_use]
    pub fn rules(&self) -> &RuleChain {
        &self.chain
    }

    /// Wrap a pulldown-cmark event stream, embedding matched URLs.
    ///
    /// Matches become [`Event::InlineHtml`]. Text inside links, images,
    /// code blocks and metadata blocks is left alone.
    pub fn embed<'a, I>(&self, events: I) -> EmbedVideos<'_, 'a, I::IntoIter>
    where
        I: IntoIterator<Item = Event<'a>>,
    {
        EmbedVideos {
            inner: TextMergeStream::new(events.into_iter()),
            extension: self,
            pending: VecDeque::new(),
            opaque_depth: 0,
        }
    }

    /// Render markdown to HTML with videos embedded.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, self.embed(parser));
        html
    }
}

/// Event iterator returned by [`VideoExtension::embed`].
pub struct EmbedVideos<'x, 'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    inner: TextMergeStream<'a, I>,
    extension: &'x VideoExtension,
    pending: VecDeque<Event<'a>>,
    /// Nesting depth of elements whose text must not be embedded.
    opaque_depth: usize,
}

impl<'a, I> Iterator for EmbedVideos<'_, 'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let event = self.inner.next()?;
        match &event {
            Event::Start(
                Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_) | Tag::MetadataBlock(_),
            ) => self.opaque_depth += 1,
            Event::End(
                TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock | TagEnd::MetadataBlock(_),
            ) => self.opaque_depth = self.opaque_depth.saturating_sub(1),
            Event::Text(text) if self.opaque_depth == 0 => {
                let segments = self.extension.chain.apply(text, &self.extension.config);
                if segments.iter().any(|s| matches!(s, Segment::Fragment(_))) {
                    self.pending
                        .extend(segments.into_iter().map(segment_to_event));
                    return self.pending.pop_front();
                }
            }
            _ => {}
        }
        Some(event)
    }
}

fn segment_to_event<'a>(segment: Segment) -> Event<'a> {
    match segment {
        Segment::Text(text) => Event::Text(text.into()),
        Segment::Fragment(element) => Event::InlineHtml(element.to_html().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const YOUKU_URL: &str = "http://v.youku.com/v_show/id_XMjkzOTc5MzQw.html";
    const TUDOU_URL: &str = "http://www.tudou.com/programs/view/6K89f_CqbYw/";

    const YOUKU_OBJECT: &str = concat!(
        r#"<object data="http://player.youku.com/player.php/sid/XMjkzOTc5MzQw/v.swf" height="400" type="application/x-shockwave-flash" width="480">"#,
        r#"<param name="movie" value="http://player.youku.com/player.php/sid/XMjkzOTc5MzQw/v.swf"></param>"#,
        r#"<param name="allowFullScreen" value="true"></param>"#,
        r#"<embed allowFullScreen="true" height="400" src="http://player.youku.com/player.php/sid/XMjkzOTc5MzQw/v.swf" type="application/x-shockwave-flash" width="480"></embed>"#,
        "</object>"
    );

    const TUDOU_OBJECT: &str = concat!(
        r#"<object data="http://www.tudou.com/v/6K89f_CqbYw/v.swf" height="400" type="application/x-shockwave-flash" width="480">"#,
        r#"<param name="movie" value="http://www.tudou.com/v/6K89f_CqbYw/v.swf"></param>"#,
        r#"<param name="allowFullScreen" value="true"></param>"#,
        r#"<embed allowFullScreen="true" height="400" src="http://www.tudou.com/v/6K89f_CqbYw/v.swf" type="application/x-shockwave-flash" width="480"></embed>"#,
        "</object>"
    );

    fn extension() -> VideoExtension {
        VideoExtension::new(VideoConfig::default()).unwrap()
    }

    #[test]
    fn test_render_youku() {
        assert_eq!(
            extension().render(YOUKU_URL),
            format!("<p>{YOUKU_OBJECT}</p>\n")
        );
    }

    #[test]
    fn test_render_tudou() {
        assert_eq!(
            extension().render(TUDOU_URL),
            format!("<p>{TUDOU_OBJECT}</p>\n")
        );
    }

    #[test]
    fn test_render_tudou_with_trailing_path() {
        let html = extension().render(&format!("{TUDOU_URL}?fr=rec1"));
        assert_eq!(html, format!("<p>{TUDOU_OBJECT}</p>\n"));
    }

    #[test]
    fn test_render_inline_with_text() {
        let html = extension().render(&format!("Watch {YOUKU_URL} now"));
        assert_eq!(html, format!("<p>Watch {YOUKU_OBJECT} now</p>\n"));
    }

    #[test]
    fn test_render_parenthesized_url_untouched() {
        let html = extension().render(&format!("({YOUKU_URL})"));
        assert_eq!(html, format!("<p>({YOUKU_URL})</p>\n"));
    }

    #[test]
    fn test_render_link_destination_untouched() {
        let html = extension().render(&format!("[video]({YOUKU_URL})"));
        assert_eq!(html, format!("<p><a href=\"{YOUKU_URL}\">video</a></p>\n"));
    }

    #[test]
    fn test_render_autolink_untouched() {
        let html = extension().render(&format!("<{YOUKU_URL}>"));
        assert_eq!(
            html,
            format!("<p><a href=\"{YOUKU_URL}\">{YOUKU_URL}</a></p>\n")
        );
    }

    #[test]
    fn test_render_code_untouched() {
        let html = extension().render(&format!("`{YOUKU_URL}`\n\n```\n{TUDOU_URL}\n```\n"));
        assert!(!html.contains("<object"));
        assert!(html.contains(&format!("<code>{YOUKU_URL}</code>")));
        assert!(html.contains(&format!("<pre><code>{TUDOU_URL}\n</code></pre>")));
    }

    #[test]
    fn test_render_inside_emphasis() {
        let html = extension().render(&format!("*{YOUKU_URL}*"));
        assert_eq!(html, format!("<p><em>{YOUKU_OBJECT}</em></p>\n"));
    }

    #[test]
    fn test_render_multiple_lines() {
        let html = extension().render(&format!("{YOUKU_URL}\n{TUDOU_URL}"));
        assert_eq!(html, format!("<p>{YOUKU_OBJECT}\n{TUDOU_OBJECT}</p>\n"));
    }

    #[test]
    fn test_render_plain_markdown_unchanged() {
        let html = extension().render("# Title\n\nSome **bold** text.");
        assert_eq!(
            html,
            "<h1>Title</h1>\n<p>Some <strong>bold</strong> text.</p>\n"
        );
    }

    #[test]
    fn test_render_back_to_back_urls() {
        let html = extension().render(&format!("{YOUKU_URL}{YOUKU_URL}"));
        assert_eq!(html, format!("<p>{YOUKU_OBJECT}{YOUKU_OBJECT}</p>\n"));
    }

    #[test]
    fn test_render_with_table_options() {
        let markdown = format!("| Video |\n| --- |\n| {YOUKU_URL} |\n");

        let html = extension()
            .with_options(Options::ENABLE_TABLES)
            .render(&markdown);

        assert!(html.contains("<table>"));
        assert!(html.contains(&format!("<td>{YOUKU_OBJECT}")));
    }

    #[test]
    fn test_render_without_table_options() {
        let markdown = format!("| Video |\n| --- |\n| {YOUKU_URL} |\n");
        let html = extension().render(&markdown);
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_render_is_idempotent_on_output() {
        let extension = extension();
        let once = extension.render(YOUKU_URL);
        let twice = extension.render(&once);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_render_with_width_override() {
        let config = VideoConfig::with_overrides([("youku_width", "640")]).unwrap();
        let html = VideoExtension::new(config).unwrap().render(YOUKU_URL);

        assert_eq!(html.matches(r#"width="640""#).count(), 2);
        assert!(!html.contains(r#"width="480""#));
    }

    #[test]
    fn test_render_deterministic() {
        assert_eq!(extension().render(TUDOU_URL), extension().render(TUDOU_URL));
    }

    #[test]
    fn test_embed_events() {
        let markdown = format!("a {YOUKU_URL}");
        let extension = extension();
        let events: Vec<_> = extension.embed(Parser::new(&markdown)).collect();

        assert_eq!(
            events,
            vec![
                Event::Start(Tag::Paragraph),
                Event::Text("a ".into()),
                Event::InlineHtml(YOUKU_OBJECT.into()),
                Event::End(TagEnd::Paragraph),
            ]
        );
    }

    #[test]
    fn test_extend_installs_rules() {
        let mut chain = RuleChain::new();
        extension().extend(&mut chain).unwrap();
        assert_eq!(chain.names(), vec!["youku", "tudou"]);
    }

    #[test]
    fn test_extend_twice_fails() {
        let extension = extension();
        let mut chain = RuleChain::new();
        extension.extend(&mut chain).unwrap();

        let result = extension.extend(&mut chain);

        assert!(matches!(result, Err(EmbedError::DuplicateRule(_))));
    }

    #[test]
    fn test_extension_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VideoExtension>();
    }
}
