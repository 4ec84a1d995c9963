use crate::config::RedirectStatus;
use crate::redirector::{Decision, Redirector, RequestContext};
use actix_web::http::header::{self, ContentType};
use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, web};
use percent_encoding::{CONTROLS, percent_decode_str, utf8_percent_encode};
use std::sync::Arc;

// Catch-all handler; every request lands here.
pub async fn handle(req: HttpRequest, redirector: web::Data<Arc<Redirector>>) -> HttpResponse {
    let remote_addr = req
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_default();

    // Match, log and append the decoded path so encoded probes are still caught.
    let path = percent_decode_str(req.path()).decode_utf8_lossy();

    let ctx = RequestContext {
        remote_addr: &remote_addr,
        method: req.method().as_str(),
        path: &path,
        query: req.query_string(),
    };

    match redirector.handle(&ctx) {
        Decision::Health => HttpResponse::Ok().body("OK"),
        Decision::Blocked => HttpResponse::NotFound()
            .content_type(ContentType::plaintext())
            .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
            .body("404 page not found\n"),
        Decision::Redirect { location, status } => redirect(req.method(), location, status),
    }
}

fn redirect(method: &Method, location: String, status: RedirectStatus) -> HttpResponse {
    let code = match status {
        RedirectStatus::MovedPermanently => StatusCode::MOVED_PERMANENTLY,
        RedirectStatus::Found => StatusCode::FOUND,
    };

    let mut response = HttpResponse::build(code);
    if *method == Method::GET || *method == Method::HEAD {
        response.content_type(ContentType::html());
    }
    if *method == Method::GET {
        let body = format!(
            "<a href=\"{}\">{}</a>.\n",
            html_escape(&location),
            status.reason()
        );
        return response
            .insert_header((header::LOCATION, location_header(&location)))
            .body(body);
    }
    response
        .insert_header((header::LOCATION, location_header(&location)))
        .finish()
}

// Decoded paths may carry non-ASCII or control bytes; escape them so the header stays valid.
fn location_header(location: &str) -> String {
    utf8_percent_encode(location, CONTROLS).to_string()
}

fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
