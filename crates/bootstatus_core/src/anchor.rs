use scraper::{Html, Selector};
use url::Url;

/// Target of the first `<a href>` in an HTML fragment, resolved against `base`.
pub fn first_anchor_target(fragment: &str, base: &Url) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    let doc = Html::parse_fragment(fragment);
    let href = doc.select(&selector).next()?.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    match Url::parse(href) {
        Ok(url) => Some(url.into()),
        Err(_) => base.join(href).ok().map(Into::into),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://192.168.1.10:5000/status/index.html").unwrap()
    }

    #[test]
    fn absolute_href_is_kept_verbatim() {
        let body = r#"Ready: <a href="http://portal/x">open portal</a>"#;
        assert_eq!(
            first_anchor_target(body, &base()).as_deref(),
            Some("http://portal/x")
        );
    }

    #[test]
    fn relative_href_resolves_against_page() {
        let body = r#"<A HREF='setup/'>continue</A>"#;
        assert_eq!(
            first_anchor_target(body, &base()).as_deref(),
            Some("http://192.168.1.10:5000/status/setup/")
        );
    }

    #[test]
    fn first_anchor_wins() {
        let body = r#"<a href="http://one/">1</a> <a href="http://two/">2</a>"#;
        assert_eq!(
            first_anchor_target(body, &base()).as_deref(),
            Some("http://one/")
        );
    }

    #[test]
    fn marker_without_anchor_yields_none() {
        assert_eq!(first_anchor_target("use href= to link", &base()), None);
    }
}
