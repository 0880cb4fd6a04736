use super::{find_faculty, find_student};
use crate::errors::ApiError;
use crate::models::{AvatarRecord, Faculty, NamedItem, Student, StudentPayload};
use crate::printer::{PrintOutcome, StudentPrinter};
use crate::store::{Store, StoreBackend, Table};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

/// How many students `last_five` returns
const LAST_STUDENTS_LIMIT: usize = 5;

pub struct StudentService<'a> {
    store: &'a Store,
}

impl<'a> StudentService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Faculty references must point at an existing faculty
    async fn check_faculty(&self, faculty_id: Option<u64>) -> Result<(), ApiError> {
        if let Some(faculty_id) = faculty_id {
            debug!("Looking for faculty with id: {}", faculty_id);
            find_faculty(self.store, faculty_id).await?;
        }
        Ok(())
    }

    pub async fn create(&self, payload: StudentPayload) -> Result<Student, ApiError> {
        info!("Was invoked method for create student");
        debug!(
            "Creating student with data: name={}, age={}",
            payload.name, payload.age
        );

        self.check_faculty(payload.faculty_id).await?;

        let id = self.store.next_id(Table::Students).await?;
        let student = Student {
            id,
            name: payload.name,
            age: payload.age,
            faculty_id: payload.faculty_id,
        };
        self.store.put(Table::Students, id, &student).await?;

        info!("Student created successfully with id: {}", id);
        Ok(student)
    }

    pub async fn get(&self, id: u64) -> Result<Student, ApiError> {
        info!("Was invoked method for get student by id = {}", id);
        find_student(self.store, id).await
    }

    /// Replaces name, age and faculty. A payload without faculty detaches
    /// the student from its current one.
    pub async fn update(&self, id: u64, payload: StudentPayload) -> Result<Student, ApiError> {
        info!("Was invoked method for update student with id = {}", id);

        let existing = find_student(self.store, id).await?;
        self.check_faculty(payload.faculty_id).await?;
        if payload.faculty_id.is_none() && existing.faculty_id.is_some() {
            debug!("No faculty provided, detaching student {} from faculty", id);
        }

        let student = Student {
            id,
            name: payload.name,
            age: payload.age,
            faculty_id: payload.faculty_id,
        };
        self.store.put(Table::Students, id, &student).await?;

        info!("Student with id {} updated successfully", id);
        Ok(student)
    }

    /// Removes the student together with its avatar
    pub async fn delete(&self, id: u64) -> Result<Student, ApiError> {
        info!("Was invoked method for delete student with id = {}", id);

        let student = find_student(self.store, id).await?;
        let avatars: Vec<AvatarRecord> = self.store.list(Table::Avatars).await?;
        for avatar in avatars.iter().filter(|avatar| avatar.student_id == id) {
            debug!("Deleting avatar {} of student {}", avatar.id, id);
            self.store.delete(Table::Avatars, avatar.id).await?;
        }
        self.store.delete(Table::Students, id).await?;

        info!("Student with id {} deleted successfully", id);
        Ok(student)
    }

    pub async fn all(&self) -> Result<Vec<Student>, ApiError> {
        info!("Was invoked method for get all students");
        let students: Vec<Student> = self.store.list(Table::Students).await?;
        debug!("Found {} students in database", students.len());
        Ok(students)
    }

    pub async fn by_age(&self, age: i32) -> Result<Vec<Student>, ApiError> {
        info!("Was invoked method for get students by age = {}", age);
        let students = self.all().await?;
        Ok(students.into_iter().filter(|s| s.age == age).collect())
    }

    /// Students whose age lies in `min..=max`
    pub async fn by_age_between(&self, min: i32, max: i32) -> Result<Vec<Student>, ApiError> {
        info!(
            "Was invoked method for get students by age between {} and {}",
            min, max
        );
        let students = self.all().await?;
        Ok(students
            .into_iter()
            .filter(|s| (min..=max).contains(&s.age))
            .collect())
    }

    pub async fn faculty_of(&self, id: u64) -> Result<Faculty, ApiError> {
        info!("Was invoked method for get faculty by student id = {}", id);

        let student = find_student(self.store, id).await?;
        let Some(faculty_id) = student.faculty_id else {
            warn!("Student with id {} doesn't have a faculty", id);
            return Err(ApiError::not_found(format!(
                "Student with id {id} doesn't have a faculty"
            )));
        };
        find_faculty(self.store, faculty_id).await
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        info!("Was invoked method for get total number of students");
        Ok(self.store.count(Table::Students).await?)
    }

    /// Mean age, or `None` without students
    pub async fn average_age(&self) -> Result<Option<f64>, ApiError> {
        info!("Was invoked method for get average age of students");

        let students = self.all().await?;
        if students.is_empty() {
            warn!("Average age calculation has no students to work with");
            return Ok(None);
        }
        let total: i64 = students.iter().map(|s| i64::from(s.age)).sum();
        Ok(Some(total as f64 / students.len() as f64))
    }

    /// Mean age folded over the whole list, `0.0` without students
    pub async fn average_age_streamed(&self) -> Result<f64, ApiError> {
        info!("Was invoked method for get average age using the full student list");

        let students = self.all().await?;
        let (sum, count) = students
            .iter()
            .fold((0i64, 0u64), |(sum, count), s| (sum + i64::from(s.age), count + 1));
        if count == 0 {
            warn!("No students found in database");
            return Ok(0.0);
        }
        Ok(sum as f64 / count as f64)
    }

    /// The five most recently created students, newest first
    pub async fn last_five(&self) -> Result<Vec<Student>, ApiError> {
        info!("Was invoked method for get last five students");
        let students = self.all().await?;
        Ok(students.into_iter().rev().take(LAST_STUDENTS_LIMIT).collect())
    }

    /// Uppercased, sorted names starting with a Latin or Cyrillic "A"
    pub async fn names_starting_with_a(&self) -> Result<Vec<String>, ApiError> {
        info!("Was invoked method for get students names starting with 'A'");

        let mut names: Vec<String> = self
            .all()
            .await?
            .into_iter()
            .map(|s| s.name.to_uppercase())
            .filter(|name| name.starts_with('A') || name.starts_with('А'))
            .collect();
        names.sort();

        debug!("Found {} students names starting with 'A'", names.len());
        Ok(names)
    }

    /// The first `limit` students by id, or all of them when there are fewer
    pub async fn first_students(&self, limit: usize) -> Result<Vec<Student>, ApiError> {
        let students = self.all().await?;
        if students.len() < limit {
            warn!(
                "Not enough students in database. Need at least {}, but found {}",
                limit,
                students.len()
            );
        }
        Ok(students.into_iter().take(limit).collect())
    }

    async fn printable_students(&self, printer: &StudentPrinter) -> Result<Vec<NamedItem>, ApiError> {
        let students = self.first_students(printer.required_items()).await?;
        Ok(students.iter().map(NamedItem::from).collect())
    }

    pub async fn print_parallel(
        &self,
        printer: &StudentPrinter,
        cancel: &CancellationToken,
    ) -> Result<PrintOutcome, ApiError> {
        let items = self.printable_students(printer).await?;
        Ok(printer.print_parallel(&items, cancel).await)
    }

    pub async fn print_synchronized(
        &self,
        printer: &StudentPrinter,
        cancel: &CancellationToken,
    ) -> Result<PrintOutcome, ApiError> {
        let items = self.printable_students(printer).await?;
        Ok(printer.print_synchronized(&items, cancel).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrinterConfig;
    use crate::models::FacultyPayload;
    use crate::services::FacultyService;
    use crate::store::memory::InMemoryStore;
    use http::StatusCode;

    fn payload(name: &str, age: i32, faculty_id: Option<u64>) -> StudentPayload {
        StudentPayload {
            name: name.to_string(),
            age,
            faculty_id,
        }
    }

    async fn seeded_store() -> Store {
        let store = Store::InMemory(InMemoryStore::new());
        let students = StudentService::new(&store);
        for (name, age) in [
            ("Harry", 17),
            ("Ron", 17),
            ("Hermione", 18),
            ("Draco", 17),
            ("Neville", 16),
            ("Luna", 16),
            ("arthur", 45),
        ] {
            students.create(payload(name, age, None)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_create_with_unknown_faculty_fails() {
        let store = Store::InMemory(InMemoryStore::new());
        let err = StudentService::new(&store)
            .create(payload("Harry", 17, Some(42)))
            .await
            .unwrap_err();

        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "Faculty not found with id: 42");
        assert_eq!(store.count(Table::Students).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_detaches_faculty_when_omitted() {
        let store = Store::InMemory(InMemoryStore::new());
        let faculty = FacultyService::new(&store)
            .create(FacultyPayload {
                name: "Gryffindor".to_string(),
                color: "Red".to_string(),
            })
            .await
            .unwrap();
        let service = StudentService::new(&store);
        let student = service
            .create(payload("Harry", 17, Some(faculty.id)))
            .await
            .unwrap();
        assert_eq!(service.faculty_of(student.id).await.unwrap(), faculty);

        let updated = service
            .update(student.id, payload("Harry Potter", 18, None))
            .await
            .unwrap();
        assert_eq!(updated.name, "Harry Potter");
        assert_eq!(updated.faculty_id, None);

        let err = service.faculty_of(student.id).await.unwrap_err();
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_student_is_not_found() {
        let store = Store::InMemory(InMemoryStore::new());
        let service = StudentService::new(&store);

        for err in [
            service.get(9).await.unwrap_err(),
            service.update(9, payload("x", 1, None)).await.unwrap_err(),
            service.delete(9).await.unwrap_err(),
        ] {
            assert_eq!(err.status_code, StatusCode::NOT_FOUND);
            assert_eq!(err.detail, "Student not found with id: 9");
        }
    }

    #[tokio::test]
    async fn test_age_filters() {
        let store = seeded_store().await;
        let service = StudentService::new(&store);

        let seventeen: Vec<String> = service
            .by_age(17)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(seventeen, vec!["Harry", "Ron", "Draco"]);

        let teens = service.by_age_between(16, 17).await.unwrap();
        assert_eq!(teens.len(), 5);
        assert!(service.by_age_between(30, 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_aggregates() {
        let store = seeded_store().await;
        let service = StudentService::new(&store);

        assert_eq!(service.count().await.unwrap(), 7);
        let expected = (17 + 17 + 18 + 17 + 16 + 16 + 45) as f64 / 7.0;
        assert_eq!(service.average_age().await.unwrap(), Some(expected));
        assert_eq!(service.average_age_streamed().await.unwrap(), expected);

        let last: Vec<u64> = service
            .last_five()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(last, vec![7, 6, 5, 4, 3]);
    }

    #[tokio::test]
    async fn test_aggregates_without_students() {
        let store = Store::InMemory(InMemoryStore::new());
        let service = StudentService::new(&store);

        assert_eq!(service.count().await.unwrap(), 0);
        assert_eq!(service.average_age().await.unwrap(), None);
        assert_eq!(service.average_age_streamed().await.unwrap(), 0.0);
        assert!(service.last_five().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_names_starting_with_a() {
        let store = seeded_store().await;
        let service = StudentService::new(&store);
        service.create(payload("Анна", 15, None)).await.unwrap();
        service.create(payload("Abbott", 15, None)).await.unwrap();

        assert_eq!(
            service.names_starting_with_a().await.unwrap(),
            vec!["ABBOTT", "ARTHUR", "АННА"]
        );
    }

    #[tokio::test]
    async fn test_first_students() {
        let store = seeded_store().await;
        let service = StudentService::new(&store);

        let first_six = service.first_students(6).await.unwrap();
        assert_eq!(first_six.len(), 6);
        assert_eq!(first_six[0].name, "Harry");
        assert_eq!(first_six[5].name, "Luna");

        assert_eq!(service.first_students(10).await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_print_skips_without_enough_students() {
        let store = Store::InMemory(InMemoryStore::new());
        let service = StudentService::new(&store);
        service.create(payload("Harry", 17, None)).await.unwrap();
        let printer = StudentPrinter::stdout(PrinterConfig::default());

        let outcome = service
            .print_parallel(&printer, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            PrintOutcome::Skipped {
                available: 1,
                required: 6
            }
        );
    }

    #[tokio::test]
    async fn test_print_synchronized_uses_first_six() {
        let store = seeded_store().await;
        let service = StudentService::new(&store);
        let printer = StudentPrinter::stdout(PrinterConfig::default());

        let outcome = service
            .print_synchronized(&printer, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            PrintOutcome::Completed {
                printed: 6,
                failed_workers: 0
            }
        );
    }
}
