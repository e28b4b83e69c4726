//! Member directory service

use validator::Validate;

use crate::{
    error::AppResult,
    models::member::{CreateMember, Member},
    repository::Repository,
};

#[derive(Clone)]
pub struct DirectoryService {
    repository: Repository,
}

impl DirectoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new member
    pub async fn create_member(&self, member: CreateMember) -> AppResult<Member> {
        member.validate()?;

        let created = self.repository.members.create(&member).await?;
        tracing::info!("Member {} registered: {}", created.id, created.name);
        Ok(created)
    }

    /// Get member by ID
    pub async fn get_member(&self, id: i32) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// List all members
    pub async fn list_members(&self) -> AppResult<Vec<Member>> {
        self.repository.members.list_all().await
    }
}
