//! Submission classification.
//!
//! Rules are evaluated in [`RULES`] order and the first one that matches decides the
//! outcome. Classification looks only at the URL shape and the media descriptor,
//! never at the fetched content.

use crate::domain::entities::{ExtractedSubmission, FeedItem, MediaKind};
use crate::domain::sanitize::sanitize_title;

/// Substring identifying the third-party gif host.
pub const GIF_HOST_MARKER: &str = "gfycat";

/// Suffixes that mark a URL as a direct image/gif link. Case-sensitive.
pub const DIRECT_MEDIA_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

const VIDEO_EXTENSION: &str = ".mp4";
const GIF_EXTENSION: &str = ".gif";

/// Outcome of a matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Skip(SkipReason),
    Emit {
        url: String,
        extension: String,
        kind: MediaKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Adult,
    Unsupported,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Adult => f.write_str("adult"),
            SkipReason::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Why an item was dropped: the deciding rule (`none` if nothing matched) and the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skipped {
    pub rule: &'static str,
    pub reason: SkipReason,
}

/// One entry of the priority chain. `apply` returns `None` when the rule does not match.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&FeedItem) -> Option<Verdict>,
}

/// The priority chain, highest priority first.
pub const RULES: &[Rule] = &[
    Rule {
        name: "adult",
        apply: adult_rule,
    },
    Rule {
        name: "hosted_gif",
        apply: hosted_gif_rule,
    },
    Rule {
        name: "direct_image",
        apply: direct_image_rule,
    },
    Rule {
        name: "embedded_video",
        apply: embedded_video_rule,
    },
];

fn adult_rule(item: &FeedItem) -> Option<Verdict> {
    item.is_adult.then_some(Verdict::Skip(SkipReason::Adult))
}

/// Appends `.gif` unconditionally; the host serves the gif at that path.
fn hosted_gif_rule(item: &FeedItem) -> Option<Verdict> {
    if !item.url.contains(GIF_HOST_MARKER) {
        return None;
    }
    Some(Verdict::Emit {
        url: format!("{}{}", item.url, GIF_EXTENSION),
        extension: GIF_EXTENSION.to_string(),
        kind: MediaKind::HostedGif,
    })
}

fn direct_image_rule(item: &FeedItem) -> Option<Verdict> {
    if !DIRECT_MEDIA_SUFFIXES.iter().any(|s| item.url.ends_with(s)) {
        return None;
    }
    let last_segment = item.url.rsplit('.').next().unwrap_or_default();
    Some(Verdict::Emit {
        url: item.url.clone(),
        extension: format!(".{}", last_segment),
        kind: MediaKind::DirectImage,
    })
}

fn embedded_video_rule(item: &FeedItem) -> Option<Verdict> {
    let url = fallback_video_url(item.media.as_ref()?)?;
    Some(Verdict::Emit {
        url: url.to_string(),
        extension: VIDEO_EXTENSION.to_string(),
        kind: MediaKind::EmbeddedVideo,
    })
}

/// `media.reddit_video.fallback_url`, if the descriptor has that shape.
fn fallback_video_url(media: &serde_json::Value) -> Option<&str> {
    media.get("reddit_video")?.get("fallback_url")?.as_str()
}

/// Run the rule chain for one item without touching the title.
pub fn evaluate(item: &FeedItem) -> (&'static str, Verdict) {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(item).map(|v| (rule.name, v)))
        .unwrap_or(("none", Verdict::Skip(SkipReason::Unsupported)))
}

/// Classify one feed item, reporting the skip reason when it is dropped.
pub fn classify_detailed(item: &FeedItem) -> Result<ExtractedSubmission, Skipped> {
    match evaluate(item) {
        (rule, Verdict::Skip(reason)) => Err(Skipped { rule, reason }),
        (
            _,
            Verdict::Emit {
                url,
                extension,
                kind,
            },
        ) => Ok(ExtractedSubmission {
            title: sanitize_title(&item.title),
            url,
            extension,
            kind,
        }),
    }
}

/// Classify one feed item. `None` means the item is skipped.
pub fn classify(item: &FeedItem) -> Option<ExtractedSubmission> {
    classify_detailed(item).ok()
}

/// Classify a batch. Output keeps source order; skipped items leave no trace in it
/// and are reported to `on_skip` instead.
pub fn extract_submissions<I, F>(items: I, mut on_skip: F) -> Vec<ExtractedSubmission>
where
    I: IntoIterator<Item = FeedItem>,
    F: FnMut(&FeedItem, Skipped),
{
    items
        .into_iter()
        .filter_map(|item| match classify_detailed(&item) {
            Ok(s) => Some(s),
            Err(skipped) => {
                on_skip(&item, skipped);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(url: &str) -> FeedItem {
        FeedItem {
            title: "a title".into(),
            url: url.into(),
            media: None,
            is_adult: false,
        }
    }

    fn video_media(fallback: &str) -> serde_json::Value {
        json!({ "reddit_video": { "fallback_url": fallback, "height": 720 } })
    }

    #[test]
    fn adult_items_are_always_skipped() {
        let mut it = item("https://gfycat.com/abc");
        it.is_adult = true;
        it.media = Some(video_media("https://v.redd.it/x.mp4"));
        assert_eq!(classify(&it), None);
        assert_eq!(evaluate(&it), ("adult", Verdict::Skip(SkipReason::Adult)));

        it.url = "https://i.example.com/a.png".into();
        assert_eq!(classify(&it), None);
    }

    #[test]
    fn gif_host_appends_gif_suffix() {
        let out = classify(&item("https://gfycat.com/abcXYZ")).unwrap();
        assert_eq!(out.url, "https://gfycat.com/abcXYZ.gif");
        assert_eq!(out.extension, ".gif");
        assert_eq!(out.kind, MediaKind::HostedGif);
    }

    #[test]
    fn gif_host_wins_over_direct_suffix() {
        let out = classify(&item("https://thumbs.gfycat.com/abc.gif")).unwrap();
        assert_eq!(out.url, "https://thumbs.gfycat.com/abc.gif.gif");
        assert_eq!(out.kind, MediaKind::HostedGif);
    }

    #[test]
    fn direct_suffix_keeps_url_and_derives_extension() {
        let out = classify(&item("https://x.com/img.png")).unwrap();
        assert_eq!(out.url, "https://x.com/img.png");
        assert_eq!(out.extension, ".png");
        assert_eq!(out.kind, MediaKind::DirectImage);

        let out = classify(&item("https://i.example.com/photo.v2.jpeg")).unwrap();
        assert_eq!(out.extension, ".jpeg");
    }

    #[test]
    fn direct_suffix_is_case_sensitive() {
        assert_eq!(classify(&item("https://x.com/img.PNG")), None);

        let mut it = item("https://x.com/img.PNG");
        it.media = Some(video_media("https://v.redd.it/x.mp4"));
        assert_eq!(classify(&it).unwrap().kind, MediaKind::EmbeddedVideo);
    }

    #[test]
    fn query_string_defeats_direct_suffix() {
        assert_eq!(classify(&item("https://x.com/img.png?width=640")), None);
    }

    #[test]
    fn embedded_video_uses_fallback_url() {
        let mut it = item("https://v.redd.it/x");
        it.media = Some(video_media("https://v.redd.it/x.mp4"));
        let out = classify(&it).unwrap();
        assert_eq!(out.url, "https://v.redd.it/x.mp4");
        assert_eq!(out.extension, ".mp4");
        assert_eq!(out.kind, MediaKind::EmbeddedVideo);
    }

    #[test]
    fn malformed_media_is_skipped() {
        let mut it = item("https://www.youtube.com/watch?v=1");
        for media in [
            json!(null),
            json!("string"),
            json!({ "oembed": { "type": "video" } }),
            json!({ "reddit_video": { "fallback_url": 42 } }),
            json!({ "reddit_video": null }),
        ] {
            it.media = Some(media);
            assert_eq!(classify(&it), None);
        }
        it.media = None;
        assert_eq!(classify(&it), None);
    }

    #[test]
    fn title_is_sanitized() {
        let mut it = item("https://x.com/img.gif");
        it.title = "what? a \"cat\"".into();
        assert_eq!(classify(&it).unwrap().title, "what a cat");
    }

    #[test]
    fn batch_preserves_order_and_drops_skips() {
        let mut adult = item("https://x.com/1.png");
        adult.is_adult = true;
        let items = vec![
            item("https://x.com/a.png"),
            item("https://example.com/article"),
            adult,
            item("https://gfycat.com/b"),
            item("https://x.com/c.jpg"),
        ];
        let mut skipped = Vec::new();
        let urls: Vec<String> = extract_submissions(items, |it, why| skipped.push((it.url.clone(), why)))
            .into_iter()
            .map(|s| s.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://x.com/a.png",
                "https://gfycat.com/b.gif",
                "https://x.com/c.jpg"
            ]
        );
        assert_eq!(
            skipped,
            vec![
                (
                    "https://example.com/article".to_string(),
                    Skipped {
                        rule: "none",
                        reason: SkipReason::Unsupported
                    }
                ),
                (
                    "https://x.com/1.png".to_string(),
                    Skipped {
                        rule: "adult",
                        reason: SkipReason::Adult
                    }
                ),
            ]
        );
    }

    #[test]
    fn detailed_classification_names_the_deciding_rule() {
        let mut it = item("https://gfycat.com/abc");
        it.is_adult = true;
        assert_eq!(
            classify_detailed(&it),
            Err(Skipped {
                rule: "adult",
                reason: SkipReason::Adult
            })
        );
        it.is_adult = false;
        assert_eq!(classify_detailed(&it).unwrap().kind, MediaKind::HostedGif);
    }

    #[test]
    fn rules_are_in_priority_order() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["adult", "hosted_gif", "direct_image", "embedded_video"]
        );
    }
}
