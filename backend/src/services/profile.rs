//! Training profile service

use crate::error::ApiError;
use crate::repositories::{ProfileRepository, UserRepository};
use fitness_trainer_shared::types::{ProfileResponse, UpdateProfileRequest};
use fitness_trainer_shared::validation::validate_profile_update;
use fitness_trainer_shared::ProfileSnapshot;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct ProfileService;

impl ProfileService {
    /// The caller's profile; an empty one if it was never filled in
    pub async fn get_profile(db: &PgPool, user_id: Uuid) -> Result<ProfileResponse, ApiError> {
        let record = ProfileRepository::get(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let profile = match record {
            Some(record) => ProfileSnapshot::from(record),
            None => {
                if !UserRepository::exists(db, user_id)
                    .await
                    .map_err(ApiError::Internal)?
                {
                    return Err(ApiError::NotFound("User not found".to_string()));
                }
                ProfileSnapshot::default()
            }
        };

        Ok(ProfileResponse {
            success: true,
            profile,
        })
    }

    /// Replace the caller's profile
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        validate_profile_update(&req)?;

        if !UserRepository::exists(db, user_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        let record = ProfileRepository::upsert(db, user_id, &Self::snapshot(req))
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, "Training profile updated");

        Ok(ProfileResponse {
            success: true,
            profile: ProfileSnapshot::from(record),
        })
    }

    fn snapshot(req: UpdateProfileRequest) -> ProfileSnapshot {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        fn clean_list(items: Vec<String>) -> Vec<String> {
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        }

        ProfileSnapshot {
            fitness_level: clean(req.fitness_level),
            fitness_goal: clean(req.fitness_goal),
            equipment: clean_list(req.equipment),
            workout_duration: req.workout_duration,
            injuries: clean_list(req.injuries),
            weekly_workouts: req.weekly_workouts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_drops_blank_entries() {
        let snapshot = ProfileService::snapshot(UpdateProfileRequest {
            fitness_level: Some(" intermediate ".to_string()),
            fitness_goal: Some("   ".to_string()),
            equipment: vec!["dumbbells".to_string(), " ".to_string()],
            workout_duration: Some(45),
            injuries: vec![" knee ".to_string()],
            weekly_workouts: None,
        });

        assert_eq!(snapshot.fitness_level.as_deref(), Some("intermediate"));
        assert_eq!(snapshot.fitness_goal, None);
        assert_eq!(snapshot.equipment, vec!["dumbbells".to_string()]);
        assert_eq!(snapshot.workout_duration, Some(45));
        assert_eq!(snapshot.injuries, vec!["knee".to_string()]);
    }
}
