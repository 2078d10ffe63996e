pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn listening(addr: &str) -> String {
    format!("Webhook listening on {addr}")
}

pub const SHUTDOWN: &str = "Shutting down...";

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn message_received(sender: &str, body: &str) -> String {
    format!("Received message from {sender}: \n{body}")
}

pub fn dispatching(user: &str, name: &str, args: &[String]) -> String {
    format!("Dispatcher handling cmd='{name}' args='{}' user='{user}'", args.join(" "))
}

pub fn command_recorded(user: &str, name: &str) -> String {
    format!("Recorded !{name} for {user}")
}

pub fn command_fallthrough(user: &str, err: &str) -> String {
    format!("Falling back to chat for {user}: {err}")
}

pub fn model_failed(user: &str, err: &str) -> String {
    format!("Error getting AI response for {user}: {err}")
}

pub fn model_timeout(secs: u64) -> String {
    format!("model call timed out after {secs}s")
}

pub fn token_usage(model: &str, prompt: u32, completion: u32, total: u32) -> String {
    format!("Model {model} used {total} tokens ({prompt} prompt, {completion} completion)")
}

pub fn plan_stored(user: &str) -> String {
    format!("Stored last plan for {user}")
}

pub fn sending(recipient: &str, content: &str) -> String {
    format!("Bot sending message to {recipient}: {content}")
}

pub fn delivery_failed(recipient: &str, err: &str) -> String {
    format!("Error sending WhatsApp message to {recipient}: {err}")
}

pub fn webhook_rejected(err: &str) -> String {
    format!("Rejected webhook message: {err}")
}

pub fn ignored_message(kind: &str) -> String {
    format!("Ignoring non-text message of type '{kind}'")
}

pub const VERIFY_OK: &str = "Webhook verified";
pub const VERIFY_FAILED: &str = "Webhook verification failed: token mismatch";

pub fn prompt_placeholder_left(placeholder: &str) -> String {
    format!("[PROMPT RENDER ERROR] Unreplaced placeholder found in output: {placeholder}")
}
