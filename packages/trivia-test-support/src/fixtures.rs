//! JSON documents in the shapes the trivia store expects.

use serde_json::{json, Value};

/// A well-formed question whose correct answer is at `correct`.
pub fn question(id: &str, choices: usize, correct: usize) -> Value {
    let answers: Vec<Value> = (0..choices)
        .map(|i| json!({ "text": format!("choice {i}"), "correct": i == correct }))
        .collect();
    json!({
        "id": id,
        "text": format!("Question {id}?"),
        "answers": answers,
    })
}

/// `count` four-choice questions for `level`; answer 0 is always correct.
pub fn question_set(level: u32, count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| question(&format!("l{level}q{i}"), 4, 0))
            .collect(),
    )
}

/// A store catalog entry.
pub fn store_item(id: &str, price: u32, kind: &str) -> Value {
    json!({ "id": id, "name": id.to_uppercase(), "price": price, "kind": kind })
}

/// A profile document with an explicit balance and frontier.
pub fn profile(user_id: &str, points: u32, unlocked_level: u32) -> Value {
    json!({ "user_id": user_id, "points": points, "unlocked_level": unlocked_level })
}
