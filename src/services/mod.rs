// BloomBook services
// Services provide core functionality: identity, the bookmark filter pipeline, notices and settings.

pub mod bookmark_filter;
pub mod identity;
pub mod notifier;
pub mod settings_engine;
