/*
 * Responsibility
 * - Actor request/response DTOs
 * - validate(): shape checks that turn into 422
 */
use serde::{Deserialize, Serialize};

use crate::repos::{ActorChanges, ActorRow, NewActor};

const NAME_MAX_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl CreateActorRequest {
    pub fn into_new_actor(self) -> Result<NewActor, &'static str> {
        let name = self.name.unwrap_or_default();
        validate_name(&name)?;
        validate_age(self.age)?;

        Ok(NewActor {
            name: name.trim().to_string(),
            age: self.age,
            gender: self.gender,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PatchActorRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl PatchActorRequest {
    pub fn into_changes(self) -> Result<ActorChanges, &'static str> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_age(self.age)?;

        Ok(ActorChanges {
            name: self.name.map(|n| n.trim().to_string()),
            age: self.age,
            gender: self.gender,
        })
    }
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name is required");
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err("name must be <= 200 chars");
    }
    Ok(())
}

fn validate_age(age: Option<i32>) -> Result<(), &'static str> {
    match age {
        Some(age) if age < 0 => Err("age must be >= 0"),
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize)]
pub struct ActorListResponse {
    pub success: bool,
    pub actors: Vec<ActorRow>,
}

#[derive(Debug, Serialize)]
pub struct ActorPatchedResponse {
    pub success: bool,
    pub patched: ActorRow,
}

#[derive(Debug, Serialize)]
pub struct ActorDeletedResponse {
    pub success: bool,
    pub deleted: ActorRow,
}
