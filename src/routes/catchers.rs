use rocket::http::Status;
use rocket::serde::json::{json, Value};
use rocket::Catcher;

#[catch(400)]
fn bad_request() -> Value {
    json!({ "error": "Bad request" })
}

#[catch(401)]
fn unauthorized() -> Value {
    json!({ "error": "Authentication required" })
}

#[catch(403)]
fn forbidden() -> Value {
    json!({ "error": "Administrator access required" })
}

#[catch(404)]
fn not_found() -> Value {
    json!({ "error": "Resource not found" })
}

// Bodies that parse but miss or mistype fields are validation errors
#[catch(422)]
fn unprocessable() -> (Status, Value) {
    (Status::BadRequest, json!({ "error": "Malformed request body" }))
}

#[catch(500)]
fn internal_error() -> Value {
    json!({ "error": "Internal server error" })
}

pub fn catchers() -> Vec<Catcher> {
    catchers![bad_request, unauthorized, forbidden, not_found, unprocessable, internal_error]
}
