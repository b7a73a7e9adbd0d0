use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::TenantScope;
use crate::modules::academics::model::{
    CreateStudyMaterialDto, CreateTimetableEntryDto, StudyMaterial, TimetableEntry,
};
use crate::modules::classes::model::ClassRef;
use crate::modules::classes::service::ClassService;
use crate::modules::students::service::StudentService;
use crate::utils::errors::AppError;

const TIMETABLE_COLUMNS: &str =
    "id, school_id, class_id, day_of_week, period, subject, teacher_name, created_at";
const MATERIAL_COLUMNS: &str =
    "id, school_id, class_id, title, subject, file_path, uploaded_by, created_at";

pub struct AcademicsService;

impl AcademicsService {
    async fn require_class(
        db: &PgPool,
        scope: &TenantScope,
        class_id: Uuid,
    ) -> Result<(), AppError> {
        let resolved = ClassService::resolve_ref(db, scope, &ClassRef::Resolved(class_id)).await?;
        if resolved.is_none() {
            return Err(AppError::bad_request("Unknown class for this school"));
        }
        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn create_timetable_entry(
        db: &PgPool,
        scope: &TenantScope,
        dto: CreateTimetableEntryDto,
    ) -> Result<TimetableEntry, AppError> {
        Self::require_class(db, scope, dto.class_id).await?;

        let entry = sqlx::query_as::<_, TimetableEntry>(&format!(
            r#"
            INSERT INTO timetable_entries
                (school_id, class_id, day_of_week, period, subject, teacher_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TIMETABLE_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(dto.class_id)
        .bind(dto.day_of_week)
        .bind(dto.period)
        .bind(&dto.subject)
        .bind(&dto.teacher_name)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(e, "A period is already scheduled in that slot"))?;

        Ok(entry)
    }

    #[instrument(skip(db))]
    pub async fn list_timetable_for_class(
        db: &PgPool,
        scope: &TenantScope,
        class_id: Uuid,
    ) -> Result<Vec<TimetableEntry>, AppError> {
        let entries = sqlx::query_as::<_, TimetableEntry>(&format!(
            r#"
            SELECT {TIMETABLE_COLUMNS}
            FROM timetable_entries
            WHERE school_id = $1 AND class_id = $2
            ORDER BY day_of_week, period
            "#
        ))
        .bind(scope.school_id())
        .bind(class_id)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(entries)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_material(
        db: &PgPool,
        scope: &TenantScope,
        uploaded_by: Uuid,
        dto: CreateStudyMaterialDto,
    ) -> Result<StudyMaterial, AppError> {
        Self::require_class(db, scope, dto.class_id).await?;

        let material = sqlx::query_as::<_, StudyMaterial>(&format!(
            r#"
            INSERT INTO study_materials
                (school_id, class_id, title, subject, file_path, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MATERIAL_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(dto.class_id)
        .bind(&dto.title)
        .bind(&dto.subject)
        .bind(&dto.file_path)
        .bind(uploaded_by)
        .fetch_one(db)
        .await
        .map_err(AppError::internal)?;

        Ok(material)
    }

    #[instrument(skip(db))]
    pub async fn list_materials_for_class(
        db: &PgPool,
        scope: &TenantScope,
        class_id: Uuid,
    ) -> Result<Vec<StudyMaterial>, AppError> {
        let materials = sqlx::query_as::<_, StudyMaterial>(&format!(
            r#"
            SELECT {MATERIAL_COLUMNS}
            FROM study_materials
            WHERE school_id = $1 AND class_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(scope.school_id())
        .bind(class_id)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(materials)
    }

    /// Resolves the caller's own class. `None` (no student record, or a
    /// class name nothing maps to yet) means the portal shows an empty
    /// schedule rather than an error.
    async fn portal_class_id(
        db: &PgPool,
        scope: &TenantScope,
        user_id: Uuid,
    ) -> Result<Option<Uuid>, AppError> {
        let Some(student) = StudentService::find_by_user(db, scope, user_id).await? else {
            return Ok(None);
        };

        ClassService::resolve_ref(db, scope, &student.class_ref()).await
    }

    #[instrument(skip(db))]
    pub async fn portal_timetable(
        db: &PgPool,
        scope: &TenantScope,
        user_id: Uuid,
    ) -> Result<Vec<TimetableEntry>, AppError> {
        match Self::portal_class_id(db, scope, user_id).await? {
            Some(class_id) => Self::list_timetable_for_class(db, scope, class_id).await,
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(db))]
    pub async fn portal_materials(
        db: &PgPool,
        scope: &TenantScope,
        user_id: Uuid,
    ) -> Result<Vec<StudyMaterial>, AppError> {
        match Self::portal_class_id(db, scope, user_id).await? {
            Some(class_id) => Self::list_materials_for_class(db, scope, class_id).await,
            None => Ok(Vec::new()),
        }
    }
}
