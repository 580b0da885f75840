//! Mapping between forum types and Notion page properties.
//!
//! Reading is lenient: a missing or differently-typed property maps to an
//! empty string or zero, because the databases are edited by hand in the
//! Notion UI and columns drift. Only the page id and creation time are
//! required.

use chrono::{DateTime, Utc};
use forum_shared::{Comment, NewComment, NewPost, Post, VoteRecord, VoteState};
use serde_json::{json, Map, Value};

use crate::errors::StoreError;

pub const TITLE: &str = "Title";
pub const CONTENT: &str = "Content";
pub const AUTHOR_NAME: &str = "Author Name";
pub const AUTHOR_ID: &str = "Author ID";
pub const UPVOTES_COUNT: &str = "Upvotes Count";
pub const POST: &str = "Post";
pub const USER_ID: &str = "User ID";

/// Notion rejects text objects longer than this many characters.
const MAX_TEXT_CHUNK: usize = 2000;

/// Build a `title` property value.
pub fn title(text: &str) -> Value {
    json!({ "title": text_objects(text) })
}

/// Build a `rich_text` property value, splitting long text into chunks the
/// API accepts.
pub fn rich_text(text: &str) -> Value {
    json!({ "rich_text": text_objects(text) })
}

/// Build a single-page `relation` property value.
pub fn relation(page_id: &str) -> Value {
    json!({ "relation": [{ "id": page_id }] })
}

/// Build a `number` property value.
pub fn number(value: u64) -> Value {
    json!({ "number": value })
}

fn text_objects(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![text_object("")];
    }
    chars
        .chunks(MAX_TEXT_CHUNK)
        .map(|chunk| text_object(&chunk.iter().collect::<String>()))
        .collect()
}

fn text_object(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

/// Properties for a new post page. The counter starts at 0.
pub fn post_properties(post: &NewPost) -> Value {
    let mut properties = Map::new();
    properties.insert(TITLE.to_string(), title(&post.title));
    properties.insert(CONTENT.to_string(), rich_text(&post.content));
    properties.insert(AUTHOR_NAME.to_string(), rich_text(&post.author.name));
    properties.insert(AUTHOR_ID.to_string(), rich_text(&post.author.id));
    properties.insert(UPVOTES_COUNT.to_string(), number(0));
    Value::Object(properties)
}

/// Properties for a new comment page.
pub fn comment_properties(comment: &NewComment) -> Value {
    let mut properties = Map::new();
    properties.insert(CONTENT.to_string(), rich_text(&comment.content));
    properties.insert(POST.to_string(), relation(&comment.post_id));
    properties.insert(AUTHOR_NAME.to_string(), rich_text(&comment.author.name));
    properties.insert(AUTHOR_ID.to_string(), rich_text(&comment.author.id));
    Value::Object(properties)
}

/// Properties for a new upvote page.
pub fn vote_properties(post_id: &str, user_id: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(USER_ID.to_string(), rich_text(user_id));
    properties.insert(POST.to_string(), relation(post_id));
    Value::Object(properties)
}

/// Map a post page. `comments_count` is left at 0.
pub fn post_from_page(page: &Value) -> Result<Post, StoreError> {
    Ok(Post {
        id: page_id(page)?,
        title: first_plain_text(property(page, TITLE), "title"),
        content: joined_plain_text(property(page, CONTENT)),
        author_name: author_name(property(page, AUTHOR_NAME)),
        author_id: first_plain_text(property(page, AUTHOR_ID), "rich_text"),
        created_at: created_time(page)?,
        upvotes_count: number_value(property(page, UPVOTES_COUNT)),
        comments_count: 0,
    })
}

/// Map a comment page. `post_id` is used when the page has no `Post` relation.
pub fn comment_from_page(page: &Value, post_id: &str) -> Result<Comment, StoreError> {
    Ok(Comment {
        id: page_id(page)?,
        post_id: first_relation_id(property(page, POST)).unwrap_or_else(|| post_id.to_string()),
        content: joined_plain_text(property(page, CONTENT)),
        author_name: first_plain_text(property(page, AUTHOR_NAME), "rich_text"),
        author_id: first_plain_text(property(page, AUTHOR_ID), "rich_text"),
        created_at: created_time(page)?,
    })
}

/// Map an upvote page. Falls back to the queried ids when properties are missing.
pub fn vote_from_page(page: &Value, post_id: &str, user_id: &str) -> Result<VoteRecord, StoreError> {
    let archived = page
        .get("archived")
        .or_else(|| page.get("in_trash"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let recorded_user = first_plain_text(property(page, USER_ID), "rich_text");

    Ok(VoteRecord {
        id: page_id(page)?,
        post_id: first_relation_id(property(page, POST)).unwrap_or_else(|| post_id.to_string()),
        user_id: if recorded_user.is_empty() {
            user_id.to_string()
        } else {
            recorded_user
        },
        state: if archived {
            VoteState::Archived
        } else {
            VoteState::Active
        },
    })
}

fn page_id(page: &Value) -> Result<String, StoreError> {
    page.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::decode("page is missing its id"))
}

fn created_time(page: &Value) -> Result<DateTime<Utc>, StoreError> {
    let raw = page
        .get("created_time")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::decode("page is missing created_time"))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::decode(format!("invalid created_time '{}': {}", raw, e)))
}

fn property<'a>(page: &'a Value, name: &str) -> Option<&'a Value> {
    page.get("properties").and_then(|p| p.get(name))
}

fn text_segments<'a>(prop: Option<&'a Value>, kind: &str) -> impl Iterator<Item = &'a str> {
    prop.and_then(|p| p.get(kind))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|segment| segment.get("plain_text").and_then(Value::as_str))
}

fn first_plain_text(prop: Option<&Value>, kind: &str) -> String {
    text_segments(prop, kind)
        .next()
        .or_else(|| prop.and_then(|p| p.get("plain_text")).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn joined_plain_text(prop: Option<&Value>) -> String {
    text_segments(prop, "rich_text").collect()
}

/// Author names have been stored as rich text, title, formula and rollup
/// columns over time; the first non-empty representation wins.
fn author_name(prop: Option<&Value>) -> String {
    let Some(prop) = prop else {
        return String::new();
    };

    let candidates = [
        text_segments(Some(prop), "rich_text").next(),
        text_segments(Some(prop), "title").next(),
        prop.get("formula")
            .and_then(|f| f.get("string"))
            .and_then(Value::as_str),
        prop.get("rollup")
            .and_then(|r| r.get("array"))
            .and_then(Value::as_array)
            .and_then(|a| a.first())
            .and_then(|first| text_segments(Some(first), "rich_text").next()),
        prop.get("plain_text").and_then(Value::as_str),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn number_value(prop: Option<&Value>) -> u64 {
    let Some(number) = prop.and_then(|p| p.get("number")) else {
        return 0;
    };
    number
        .as_u64()
        .or_else(|| number.as_f64().filter(|n| *n > 0.0).map(|n| n as u64))
        .unwrap_or(0)
}

fn first_relation_id(prop: Option<&Value>) -> Option<String> {
    prop.and_then(|p| p.get("relation"))
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .and_then(|r| r.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
