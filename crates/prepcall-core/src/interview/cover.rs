//! Cover image selection for new interviews.

use rand::seq::SliceRandom;

const COVER_IMAGES: &[&str] = &[
    "/adobe.png",
    "/amazon.png",
    "/facebook.png",
    "/hostinger.png",
    "/pinterest.png",
    "/quora.png",
    "/reddit.png",
    "/skype.png",
    "/spotify.png",
    "/telegram.png",
    "/tiktok.png",
    "/yahoo.png",
];

/// Picks a random cover-image reference for a newly generated interview.
pub fn random_cover() -> String {
    let mut rng = rand::thread_rng();
    let cover = COVER_IMAGES
        .choose(&mut rng)
        .copied()
        .unwrap_or(COVER_IMAGES[0]);
    format!("/covers{cover}")
}
