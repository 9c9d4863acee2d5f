//! Fixed assistant persona and the per-request context message.

use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "
You are ChatGPT, a large language model trained by OpenAI.
You are chatting with a human who is asking you questions using voice dictation.
You are trying to answer the questions as best you can.
Be succint and informative unless the user asks you to be more verbose.
";

pub const CONTEXT_TEMPLATE: &str = "
For context you can use the following information:
user_location: <user_location>
user_weather: <user_weather>
";

pub const LOCATION_PLACEHOLDER: &str = "<user_location>";
pub const WEATHER_PLACEHOLDER: &str = "<user_weather>";

/// Caller-supplied ambient context, folded into the context message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_location: String,
    pub user_weather: String,
}

impl UserContext {
    pub fn new(user_location: impl Into<String>, user_weather: impl Into<String>) -> Self {
        Self {
            user_location: user_location.into(),
            user_weather: user_weather.into(),
        }
    }
}

/// Render [`CONTEXT_TEMPLATE`] for `ctx`.
pub fn render_context(ctx: &UserContext) -> String {
    render_template(CONTEXT_TEMPLATE, ctx)
}

/// Substitute both placeholders in `template` with the context text, verbatim.
///
/// Single pass: text coming from `ctx` is never scanned for placeholders.
pub fn render_template(template: &str, ctx: &UserContext) -> String {
    let substitutions = [
        (LOCATION_PLACEHOLDER, ctx.user_location.as_str()),
        (WEATHER_PLACEHOLDER, ctx.user_weather.as_str()),
    ];
    let mut out = String::with_capacity(template.len() + ctx.user_location.len() + ctx.user_weather.len());
    let mut rest = template;
    loop {
        let next = substitutions
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|pos| (pos, *token, *value)))
            .min_by_key(|(pos, _, _)| *pos);
        match next {
            Some((pos, token, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + token.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
