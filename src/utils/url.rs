//! Endpoint construction for the generation service.

/// Strip trailing slashes from a base URL.
///
/// ```
/// use chatskin::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta///"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use chatskin::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://example.test/v1beta/", "/models"),
///     "https://example.test/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// URL for a model method such as `generateContent`. A `models/` prefix on
/// the model name is accepted and not doubled.
///
/// ```
/// use chatskin::utils::url::model_action_url;
///
/// assert_eq!(
///     model_action_url("https://example.test/v1beta", "gemini-2.5-flash", "generateContent"),
///     "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
/// );
/// ```
pub fn model_action_url(base_url: &str, model: &str, action: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(base_url, &format!("models/{model}:{action}"))
}
