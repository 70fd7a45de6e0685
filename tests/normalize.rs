use chrono::Datelike;
use serde_json::json;

use account_pulse::error::AnalyzeError;
use account_pulse::normalize::ProviderCapture;

#[test]
fn api_v2_capture_normalizes_to_canonical_records() {
    let capture: ProviderCapture = serde_json::from_value(json!({
        "profile": {
            "id": "42",
            "username": "tester",
            "name": "Tester",
            "followers_count": 1000,
            "following_count": 500,
            "tweet_count": 321,
            "profile_image_url": "https://example.com/a.png",
            "description": "bio"
        },
        "tweets": [
            {
                "id": "t1",
                "text": "hello",
                "created_at": "2024-03-04T09:30:00Z",
                "public_metrics": {
                    "like_count": 100,
                    "retweet_count": 10,
                    "reply_count": 5,
                    "quote_count": 1
                },
                "entities": {
                    "hashtags": [{"tag": "growth"}],
                    "mentions": [{"username": "friend"}],
                    "urls": [{"url": "https://example.com"}]
                }
            }
        ]
    }))
    .expect("capture should deserialize");

    let (posts, profile) = capture.into_batch().expect("normalization should succeed");

    assert_eq!(profile.handle, "tester");
    assert_eq!(profile.follower_count, 1000);
    assert_eq!(profile.post_count, 321);

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "t1");
    assert_eq!(posts[0].metrics.like_count, 100);
    assert_eq!(posts[0].total_engagement(), 116);
    let entities = posts[0].entities.as_ref().expect("entities kept");
    assert_eq!(entities.hashtags, vec!["growth".to_string()]);
    assert_eq!(entities.mentions, vec!["friend".to_string()]);
}

#[test]
fn scraper_capture_maps_legacy_field_names() {
    let capture: ProviderCapture = serde_json::from_value(json!({
        "profile": {
            "id_str": "99",
            "screen_name": "legacy",
            "name": "Legacy User",
            "followers_count": 2000,
            "friends_count": 100,
            "statuses_count": 5000,
            "profile_image_url_https": "https://example.com/b.png",
            "description": ""
        },
        "posts": [
            {
                "id_str": "9001",
                "full_text": "old-style payload",
                "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                "favorite_count": 7,
                "retweet_count": 3,
                "reply_count": 1
            }
        ]
    }))
    .expect("capture should deserialize");

    let (posts, profile) = capture.into_batch().expect("normalization should succeed");

    assert_eq!(profile.handle, "legacy");
    assert_eq!(profile.following_count, 100);
    assert_eq!(profile.post_count, 5000);

    assert_eq!(posts[0].id, "9001");
    assert_eq!(posts[0].metrics.like_count, 7);
    // Missing quote_count normalizes to 0.
    assert_eq!(posts[0].metrics.quote_count, 0);
    assert_eq!(posts[0].created_at.year(), 2018);
    assert_eq!(posts[0].created_at.month(), 10);
}

#[test]
fn missing_metric_fields_normalize_to_zero() {
    let capture: ProviderCapture = serde_json::from_value(json!({
        "profile": {"id": "1", "username": "u", "name": "U"},
        "posts": [
            {
                "id": "p1",
                "text": "sparse",
                "created_at": "2024-03-04T09:30:00Z",
                "public_metrics": {"like_count": 3}
            }
        ]
    }))
    .expect("capture should deserialize");

    let (posts, _) = capture.into_batch().expect("normalization should succeed");
    assert_eq!(posts[0].metrics.like_count, 3);
    assert_eq!(posts[0].metrics.retweet_count, 0);
    assert_eq!(posts[0].total_engagement(), 3);
}

#[test]
fn unparseable_timestamp_is_invalid_input() {
    let capture: ProviderCapture = serde_json::from_value(json!({
        "profile": {"id": "1", "username": "u", "name": "U"},
        "posts": [
            {
                "id": "p1",
                "text": "bad date",
                "created_at": "yesterday-ish",
                "public_metrics": {"like_count": 1}
            }
        ]
    }))
    .expect("capture should deserialize");

    let result = capture.into_batch();
    assert!(matches!(result, Err(AnalyzeError::InvalidInput(_))));
}

#[test]
fn empty_post_batch_is_invalid_input() {
    let capture: ProviderCapture = serde_json::from_value(json!({
        "profile": {"id": "1", "username": "u", "name": "U"},
        "posts": []
    }))
    .expect("capture should deserialize");

    let result = capture.into_batch();
    assert!(matches!(result, Err(AnalyzeError::InvalidInput(_))));
}
