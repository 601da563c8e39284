//! Markdown extension that embeds Youku and Tudou videos from bare URLs.
//!
//! A bare video page URL in markdown text is replaced with a legacy flash
//! `object`/`param`/`embed` fragment pointing at the site's player. URLs that
//! directly follow `(`, link destinations, and code are left alone.
//!
//! # Architecture
//!
//! - [`VideoSite`]: per-site URL pattern, player URL and dimensions, dispatched
//!   by variant through the [`EmbedPattern`] trait.
//! - [`RuleChain`]: ordered inline rules with fixed priorities; splits text
//!   spans into plain text and fragments.
//! - [`flash_object`]: builds the [`Element`] fragment.
//! - [`VideoExtension`]: owns the configuration and rule chain and adapts a
//!   pulldown-cmark event stream.
//!
//! # Example
//!
//! ```
//! let extension = mdx_video::make_extension([("youku_width", "640")]).unwrap();
//! let html = extension.render("http://v.youku.com/v_show/id_XMjkzOTc5MzQw.html");
//!
//! assert!(html.starts_with(
//!     r#"<p><object data="http://player.youku.com/player.php/sid/XMjkzOTc5MzQw/v.swf" height="400""#
//! ));
//! assert_eq!(html.matches(r#"width="640""#).count(), 2);
//! ```

mod chain;
mod element;
mod error;
mod extension;
mod flash;
mod site;

pub use chain::{InlineRule, REFERENCE_PRIORITY, RuleChain, Segment};
pub use element::{Element, escape_attribute};
pub use error::EmbedError;
pub use extension::{EmbedVideos, VideoExtension};
pub use flash::flash_object;
pub use mdx_video_config::{ConfigError, VideoConfig};
pub use site::{EmbedPattern, VideoMatch, VideoSite};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the extension from `(option, value)` overrides of the defaults.
///
/// # Errors
///
/// Returns [`EmbedError::Config`] if an option name is unknown.
pub fn make_extension<I, K, V>(overrides: I) -> Result<VideoExtension, EmbedError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let config = VideoConfig::with_overrides(overrides)?;
    VideoExtension::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_extension_defaults() {
        let extension = make_extension(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(extension.config(), &VideoConfig::default());
        assert_eq!(extension.rules().names(), vec!["youku", "tudou"]);
    }

    #[test]
    fn test_make_extension_unknown_key() {
        let result = make_extension([("youku_depth", "3")]);
        assert!(matches!(
            result,
            Err(EmbedError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn test_make_extension_override() {
        let extension = make_extension([("tudou_height", "300")]).unwrap();
        let html = extension.render("http://www.tudou.com/programs/view/abc/");
        assert_eq!(html.matches(r#"height="300""#).count(), 2);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
