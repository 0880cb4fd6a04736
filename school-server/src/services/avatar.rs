use super::find_student;
use crate::errors::ApiError;
use crate::models::{Avatar, AvatarRecord};
use crate::pagination::{Page, PageRequest};
use crate::store::{Store, StoreBackend, Table};
use log::{debug, info, warn};

pub struct AvatarService<'a> {
    store: &'a Store,
}

/// File extension for a MIME type, `bin` when it has no usable subtype
fn extension_for(media_type: &str) -> &str {
    media_type
        .split(';')
        .next()
        .and_then(|essence| essence.split_once('/'))
        .map(|(_, subtype)| subtype.trim())
        .filter(|subtype| !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin")
}

impl<'a> AvatarService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Stores a new avatar for the student, replacing any previous one
    pub async fn upload(
        &self,
        student_id: u64,
        media_type: &str,
        data: Vec<u8>,
    ) -> Result<Avatar, ApiError> {
        info!("Was invoked method for upload avatar of student {}", student_id);

        if data.is_empty() {
            return Err(ApiError::bad_request("Avatar image must not be empty"));
        }
        find_student(self.store, student_id).await?;

        let existing: Vec<AvatarRecord> = self.store.list(Table::Avatars).await?;
        for previous in existing.iter().filter(|a| a.student_id == student_id) {
            debug!("Replacing avatar {} of student {}", previous.id, student_id);
            self.store.delete(Table::Avatars, previous.id).await?;
        }

        let id = self.store.next_id(Table::Avatars).await?;
        let record = AvatarRecord {
            id,
            student_id,
            file_path: format!("avatars/{}.{}", student_id, extension_for(media_type)),
            file_size: data.len() as u64,
            media_type: media_type.to_string(),
            data,
        };
        self.store.put(Table::Avatars, id, &record).await?;

        info!("Avatar {} stored for student {}", id, student_id);
        Ok(Avatar::from(&record))
    }

    /// One page of avatars ordered by id. Paging input is normalized, never
    /// rejected.
    pub async fn list(&self, page: Option<i64>, size: Option<i64>) -> Result<Page<Avatar>, ApiError> {
        info!("Was invoked method for get all avatars with pagination");
        debug!("Getting avatars with page={:?}, size={:?}", page, size);

        let request = PageRequest::validate(page, size);
        debug!(
            "Using page={}, size={} after validation",
            request.page, request.size
        );

        let records: Vec<AvatarRecord> = self.store.list(Table::Avatars).await?;
        let avatars: Vec<Avatar> = records.iter().map(Avatar::from).collect();
        let page = Page::slice(avatars, request);

        debug!(
            "Found {} avatars on page {} (total pages: {}, total elements: {})",
            page.content.len(),
            page.page,
            page.total_pages,
            page.total_elements
        );
        if page.total_elements == 0 {
            warn!("No avatars found in database");
        }
        Ok(page)
    }

    /// Media type and bytes of a stored avatar
    pub async fn data(&self, id: u64) -> Result<(String, Vec<u8>), ApiError> {
        info!("Was invoked method for get avatar data by id = {}", id);

        let record: AvatarRecord = self
            .store
            .get(Table::Avatars, id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Avatar not found with id: {id}")))?;
        Ok((record.media_type, record.data))
    }
}
