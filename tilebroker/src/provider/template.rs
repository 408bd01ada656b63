//! Origin URL templating.
//!
//! Templates carry `{z}`, `{x}` and `{y}` placeholders plus an optional
//! `{key}` token that is filled with the provider credential once, when the
//! registry is built:
//!
//! ```text
//! https://api.maptiler.com/maps/streets-v2/{z}/{x}/{y}@2x.png?key={key}
//! ```

use crate::coord::{CoordError, TileCoordinate};

use super::types::ProviderDescriptor;

/// Token replaced by the provider credential at load time.
pub const CREDENTIAL_TOKEN: &str = "{key}";

/// Fill the credential token of a template.
///
/// The credential is percent-encoded so reserved characters (`&`, `#`,
/// spaces) stay inside the query value. A missing credential leaves the
/// parameter blank (`key=`); the template is still accepted so one
/// misconfigured provider cannot stop the process.
pub fn inject_credential(template: &str, credential: Option<&str>) -> String {
    let encoded = urlencoding::encode(credential.unwrap_or(""));
    template.replace(CREDENTIAL_TOKEN, &encoded)
}

/// Substitute `{z}`, `{x}`, `{y}` in that order, each at most once.
///
/// Placeholders absent from the template are simply skipped.
///
/// ```
/// use tilebroker::provider::substitute;
///
/// let url = substitute("https://tiles.example/{z}/{x}/{y}.png", "5", "3", "2");
/// assert_eq!(url, "https://tiles.example/5/3/2.png");
/// ```
pub fn substitute(template: &str, z: &str, x: &str, y: &str) -> String {
    template
        .replacen("{z}", z, 1)
        .replacen("{x}", x, 1)
        .replacen("{y}", y, 1)
}

/// Build the origin URL for a coordinate.
///
/// The coordinate's literal text is used as-is, except that the y value is
/// flipped for TMS origins.
pub fn origin_url(
    descriptor: &ProviderDescriptor,
    coordinate: &TileCoordinate,
) -> Result<String, CoordError> {
    let y = descriptor.scheme.origin_y(coordinate)?;
    Ok(substitute(
        &descriptor.url_template,
        coordinate.z(),
        coordinate.x(),
        &y,
    ))
}

/// Returns true when `param` appears in the query string with no value.
pub fn has_blank_credential(url: &str, param: &str) -> bool {
    let Some((_, query)) = url.split_once('?') else {
        return false;
    };
    let query = query.split('#').next().unwrap_or("");
    query.split('&').any(|pair| match pair.split_once('=') {
        Some((name, value)) => name == param && value.trim().is_empty(),
        None => pair == param,
    })
}

/// URL without its query string, safe to log.
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{ProviderId, ThemeMode, TileScheme};

    fn descriptor(template: &str, scheme: TileScheme) -> ProviderDescriptor {
        ProviderDescriptor {
            name: ProviderId::new("test"),
            theme: ThemeMode::Dark,
            base_url: "https://tiles.example/".to_string(),
            url_template: template.to_string(),
            scheme,
            credential_param: Some("key".to_string()),
        }
    }

    #[test]
    fn test_substitute_all_placeholders() {
        assert_eq!(
            substitute("https://t/{z}/{x}/{y}@2x.png?key=abc", "5", "3", "2"),
            "https://t/5/3/2@2x.png?key=abc"
        );
    }

    #[test]
    fn test_substitute_replaces_each_placeholder_once() {
        assert_eq!(
            substitute("/{z}/{z}/{x}/{y}/{y}", "5", "3", "2"),
            "/5/{z}/3/2/{y}"
        );
    }

    #[test]
    fn test_substitute_missing_placeholder_is_not_an_error() {
        assert_eq!(substitute("https://t/{z}/{x}.png", "5", "3", "2"), "https://t/5/3.png");
        assert_eq!(substitute("https://t/static.png", "5", "3", "2"), "https://t/static.png");
    }

    #[test]
    fn test_substitute_keeps_literal_text() {
        assert_eq!(substitute("/{z}/{x}/{y}", "05", "3.0", "+2"), "/05/3.0/+2");
    }

    #[test]
    fn test_inject_credential() {
        let template = "https://t/{z}/{x}/{y}.png?key={key}";
        assert_eq!(
            inject_credential(template, Some("secret")),
            "https://t/{z}/{x}/{y}.png?key=secret"
        );
        assert_eq!(inject_credential(template, None), "https://t/{z}/{x}/{y}.png?key=");
    }

    #[test]
    fn test_origin_url_xyz() {
        let d = descriptor("https://t/{z}/{x}/{y}.png?key=abc", TileScheme::Xyz);
        let c = TileCoordinate::new("3", "2", "5").unwrap();
        assert_eq!(origin_url(&d, &c).unwrap(), "https://t/5/3/2.png?key=abc");
    }

    #[test]
    fn test_origin_url_tms_flips_y() {
        let d = descriptor("https://t/{z}/{x}/{y}.png", TileScheme::Tms);
        let c = TileCoordinate::new("3", "2", "5").unwrap();
        assert_eq!(origin_url(&d, &c).unwrap(), "https://t/5/3/29.png");
    }

    #[test]
    fn test_blank_credential_detection() {
        assert!(has_blank_credential("https://t/5/3/2.png?key=", "key"));
        assert!(has_blank_credential("https://t/5/3/2.png?key=&style=x", "key"));
        assert!(has_blank_credential("https://t/5/3/2.png?style=x&key", "key"));
        assert!(has_blank_credential("https://t/5/3/2.png?key=#frag", "key"));
        assert!(!has_blank_credential("https://t/5/3/2.png?key=abc", "key"));
        assert!(!has_blank_credential("https://t/5/3/2.png?apikey=", "key"));
        assert!(!has_blank_credential("https://t/5/3/2.png", "key"));
    }

    #[test]
    fn test_inject_credential_encodes_reserved_characters() {
        let url = inject_credential("https://t/{z}/{x}/{y}.png?key={key}&v=2", Some("a&b#c d"));
        assert_eq!(url, "https://t/{z}/{x}/{y}.png?key=a%26b%23c%20d&v=2");
        assert!(!has_blank_credential(&url, "key"));

        let url = inject_credential("https://t/{z}/{x}/{y}.png?key={key}", Some("&"));
        assert!(!has_blank_credential(&url, "key"));
        assert!(url.ends_with("?key=%26"));
    }

    #[test]
    fn test_inject_credential_missing_leaves_blank() {
        let url = inject_credential("https://t/{z}/{x}/{y}.png?key={key}", None);
        assert!(url.ends_with("?key="));
        assert!(has_blank_credential(&url, "key"));
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("https://t/5/3/2.png?key=abc"), "https://t/5/3/2.png");
        assert_eq!(strip_query("https://t/5/3/2.png"), "https://t/5/3/2.png");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_substitute_fills_every_placeholder(
                z in "[0-9]{1,3}",
                x in "[0-9]{1,6}",
                y in "[0-9]{1,6}",
            ) {
                let url = substitute("https://t/{z}/{x}/{y}@2x.png?key=abc", &z, &x, &y);
                prop_assert_eq!(url, format!("https://t/{}/{}/{}@2x.png?key=abc", z, x, y));
            }

            #[test]
            fn test_strip_query_never_leaks_credential(key in "sk_[a-zA-Z0-9]{8,32}") {
                let url = inject_credential("https://t/{z}/{x}/{y}.png?key={key}", Some(&key));
                prop_assert!(!has_blank_credential(&url, "key"));
                prop_assert!(!strip_query(&url).contains(&key));
            }
        }
    }
}
