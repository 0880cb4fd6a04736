use super::find_faculty;
use crate::errors::ApiError;
use crate::models::{Faculty, FacultyPayload, Student};
use crate::store::{Store, StoreBackend, Table};
use log::{debug, info, warn};

pub struct FacultyService<'a> {
    store: &'a Store,
}

impl<'a> FacultyService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: FacultyPayload) -> Result<Faculty, ApiError> {
        info!("Was invoked method for create faculty");
        debug!(
            "Creating faculty with data: name={}, color={}",
            payload.name, payload.color
        );

        let id = self.store.next_id(Table::Faculties).await?;
        let faculty = Faculty {
            id,
            name: payload.name,
            color: payload.color,
        };
        self.store.put(Table::Faculties, id, &faculty).await?;

        info!("Faculty created successfully with id: {}", id);
        Ok(faculty)
    }

    pub async fn get(&self, id: u64) -> Result<Faculty, ApiError> {
        info!("Was invoked method for get faculty by id = {}", id);
        find_faculty(self.store, id).await
    }

    pub async fn update(&self, id: u64, payload: FacultyPayload) -> Result<Faculty, ApiError> {
        info!("Was invoked method for update faculty with id = {}", id);

        find_faculty(self.store, id).await?;
        let faculty = Faculty {
            id,
            name: payload.name,
            color: payload.color,
        };
        self.store.put(Table::Faculties, id, &faculty).await?;

        info!("Faculty with id {} updated successfully", id);
        Ok(faculty)
    }

    /// Deletes an empty faculty. Faculties that still have students are
    /// kept and reported as a conflict.
    pub async fn delete(&self, id: u64) -> Result<Faculty, ApiError> {
        info!("Was invoked method for delete faculty with id = {}", id);

        let faculty = find_faculty(self.store, id).await?;
        let members = self.members(id).await?;
        if !members.is_empty() {
            warn!(
                "Refusing to delete faculty {} with {} students",
                id,
                members.len()
            );
            return Err(ApiError::conflict(format!(
                "Faculty with id {id} still has {} students",
                members.len()
            )));
        }
        self.store.delete(Table::Faculties, id).await?;

        info!("Faculty with id {} deleted successfully", id);
        Ok(faculty)
    }

    pub async fn all(&self) -> Result<Vec<Faculty>, ApiError> {
        info!("Was invoked method for get all faculties");
        let faculties: Vec<Faculty> = self.store.list(Table::Faculties).await?;
        debug!("Found {} faculties in database", faculties.len());
        Ok(faculties)
    }

    pub async fn by_color(&self, color: &str) -> Result<Vec<Faculty>, ApiError> {
        info!("Was invoked method for get faculties by color = {}", color);
        let faculties = self.all().await?;
        Ok(faculties.into_iter().filter(|f| f.color == color).collect())
    }

    /// Faculties whose name or color equals the term, ignoring case
    pub async fn search(&self, name_or_color: &str) -> Result<Vec<Faculty>, ApiError> {
        info!(
            "Was invoked method for get faculties by name or color: {}",
            name_or_color
        );
        let term = name_or_color.to_lowercase();
        let faculties = self.all().await?;
        Ok(faculties
            .into_iter()
            .filter(|f| f.name.to_lowercase() == term || f.color.to_lowercase() == term)
            .collect())
    }

    pub async fn students_of(&self, id: u64) -> Result<Vec<Student>, ApiError> {
        info!("Was invoked method for get students by faculty id = {}", id);
        find_faculty(self.store, id).await?;
        self.members(id).await
    }

    /// The longest faculty name; ties go to the faculty created first
    pub async fn longest_name(&self) -> Result<String, ApiError> {
        info!("Was invoked method for get longest faculty name");

        let faculties = self.all().await?;
        faculties
            .into_iter()
            .map(|f| f.name)
            .reduce(|longest, name| {
                if name.chars().count() > longest.chars().count() {
                    name
                } else {
                    longest
                }
            })
            .ok_or_else(|| ApiError::not_found("No faculties found"))
    }

    async fn members(&self, id: u64) -> Result<Vec<Student>, ApiError> {
        let students: Vec<Student> = self.store.list(Table::Students).await?;
        let members: Vec<Student> = students
            .into_iter()
            .filter(|s| s.faculty_id == Some(id))
            .collect();
        debug!("Found {} students for faculty id {}", members.len(), id);
        Ok(members)
    }
}
