//! Supported video sites.
//!
//! Each site is a variant of [`VideoSite`] carrying its URL pattern, player URL
//! template and configured dimensions.
//!
//! A URL is only matched when the character immediately before it is not `(`,
//! so `[text](url)` link destinations and parenthesized URLs are left alone.
//! Only that one character is inspected: `( http://...` still matches.

use std::sync::LazyLock;

use mdx_video_config::{Dimensions, VideoConfig};
use regex::Regex;

use crate::chain::{InlineRule, REFERENCE_PRIORITY, RuleChain};
use crate::element::Element;
use crate::error::EmbedError;
use crate::flash::flash_object;

/// Regex to match a Youku video page URL.
///
/// The `.` before `html` is unescaped, so any character is accepted there.
static YOUKU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http://v\.youku\.com/v_show/id_(?P<id>\w+).html").unwrap()
});

/// Regex to match a Tudou program URL including any trailing path.
static TUDOU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http://www\.tudou\.com/programs/view/(?P<id>\w+)/\S*").unwrap()
});

/// A video hosting site with an embeddable flash player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VideoSite {
    /// `http://v.youku.com/v_show/id_<ID>.html`
    Youku,
    /// `http://www.tudou.com/programs/view/<ID>/...`
    Tudou,
}

impl VideoSite {
    /// All sites, in registration order.
    pub const ALL: [VideoSite; 2] = [VideoSite::Youku, VideoSite::Tudou];

    /// Rule name in the inline rule chain.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Youku => "youku",
            Self::Tudou => "tudou",
        }
    }

    /// Rule priority. Both sites run ahead of link syntax.
    #[must_use]
    pub fn priority(self) -> u16 {
        match self {
            Self::Youku => REFERENCE_PRIORITY + 20,
            Self::Tudou => REFERENCE_PRIORITY + 10,
        }
    }

    /// URL pattern with an `id` group.
    ///
    /// The pattern alone does not apply the `(` exclusion; use
    /// [`find_at`](Self::find_at) to locate embeddable URLs.
    #[must_use]
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Youku => &YOUKU_RE,
            Self::Tudou => &TUDOU_RE,
        }
    }

    /// Flash player URL for a video ID.
    #[must_use]
    pub fn player_url(self, id: &str) -> String {
        match self {
            Self::Youku => format!("http://player.youku.com/player.php/sid/{id}/v.swf"),
            Self::Tudou => format!("http://www.tudou.com/v/{id}/v.swf"),
        }
    }

    /// Find the first embeddable URL at or after byte offset `start`.
    ///
    /// URLs directly preceded by `(` are skipped and the search resumes one
    /// byte later, so a later URL inside a skipped match is still found.
    #[must_use]
    pub fn find_at(self, text: &str, start: usize) -> Option<VideoMatch<'_>> {
        let mut pos = start;
        while let Some(caps) = self.pattern().captures_at(text, pos) {
            let (Some(whole), Some(id)) = (caps.get(0), caps.name("id")) else {
                return None;
            };
            if text[..whole.start()].ends_with('(') {
                // patterns start with ASCII `h`
                pos = whole.start() + 1;
                continue;
            }
            return Some(VideoMatch {
                site: self,
                id: id.as_str(),
                start: whole.start(),
                end: whole.end(),
            });
        }
        None
    }

    /// Configured player dimensions for this site.
    #[must_use]
    pub fn dimensions(self, config: &VideoConfig) -> &Dimensions {
        match self {
            Self::Youku => &config.youku,
            Self::Tudou => &config.tudou,
        }
    }
}

/// A matched video URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoMatch<'t> {
    /// Site the URL belongs to.
    pub site: VideoSite,
    /// Site-specific video identifier.
    pub id: &'t str,
    /// Byte offset where the URL starts.
    pub start: usize,
    /// Byte offset just past the URL, including any trailing path.
    pub end: usize,
}

/// An inline pattern that embeds matched URLs.
///
/// `register` installs the pattern into a [`RuleChain`]; `handle` turns a
/// match into the markup fragment that replaces the URL.
pub trait EmbedPattern {
    /// Install this pattern into the rule chain.
    fn register(&self, chain: &mut RuleChain) -> Result<(), EmbedError>;

    /// Build the fragment for a match.
    fn handle(&self, matched: &VideoMatch<'_>, config: &VideoConfig) -> Element;
}

impl EmbedPattern for VideoSite {
    fn register(&self, chain: &mut RuleChain) -> Result<(), EmbedError> {
        chain.insert(InlineRule {
            name: self.name(),
            priority: self.priority(),
            site: *self,
        })
    }

    fn handle(&self, matched: &VideoMatch<'_>, config: &VideoConfig) -> Element {
        let url = self.player_url(matched.id);
        let Dimensions { width, height } = self.dimensions(config);
        flash_object(&url, width, height)
    }
}
