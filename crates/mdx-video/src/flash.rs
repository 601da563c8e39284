//! Legacy flash object embed.

use crate::element::Element;

const FLASH_MIME: &str = "application/x-shockwave-flash";

/// Build an `object`/`param`/`embed` fragment for a flash player URL.
///
/// Width, height and URL are copied into the markup unchanged.
///
/// # Example
///
/// ```
/// use mdx_video::flash_object;
///
/// let html = flash_object("http://example.com/v.swf", "480", "400").to_html();
/// assert!(html.starts_with(r#"<object data="http://example.com/v.swf" height="400""#));
/// ```
#[must_use]
pub fn flash_object(url: &str, width: &str, height: &str) -> Element {
    let movie = Element::new("param")
        .attr("name", "movie")
        .attr("value", url);
    let full_screen = Element::new("param")
        .attr("name", "allowFullScreen")
        .attr("value", "true");
    let embed = Element::new("embed")
        .attr("type", FLASH_MIME)
        .attr("width", width)
        .attr("height", height)
        .attr("src", url)
        .attr("allowFullScreen", "true");

    Element::new("object")
        .attr("type", FLASH_MIME)
        .attr("width", width)
        .attr("height", height)
        .attr("data", url)
        .child(movie)
        .child(full_screen)
        .child(embed)
}
