//! Placeholder pages behind the edge gate.

use axum::response::Html;

pub async fn login_page() -> Html<&'static str> {
    Html(concat!(
        "<!doctype html><html><head><title>Spiracle</title></head>",
        "<body><main id=\"login\"><h1>Spiracle</h1>",
        "<p>Enter the access password to talk to the Librarian.</p></main></body></html>"
    ))
}

pub async fn chat_page() -> Html<&'static str> {
    Html(concat!(
        "<!doctype html><html><head><title>Spiracle - Chat</title></head>",
        "<body><main id=\"chat\"><h1>The Librarian</h1></main></body></html>"
    ))
}
