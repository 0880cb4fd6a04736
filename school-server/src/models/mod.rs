use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier of the student
    pub id: u64,
    /// Student's full name
    pub name: String,
    /// Student's age in years
    pub age: i32,
    /// Faculty the student belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<u64>,
}

/// Body of student create and update requests
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: String,
    pub age: i32,
    /// Faculty to attach the student to; omitted means no faculty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    /// Unique identifier of the faculty
    pub id: u64,
    /// Faculty name
    pub name: String,
    /// Faculty color
    pub color: String,
}

/// Body of faculty create and update requests
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPayload {
    pub name: String,
    pub color: String,
}

/// Avatar metadata as exposed to API clients
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    /// Unique identifier of the avatar
    pub id: u64,
    /// Logical path of the uploaded file
    pub file_path: String,
    /// Size of the image in bytes
    pub file_size: u64,
    /// MIME type of the image
    pub media_type: String,
}

/// Stored avatar, including the image bytes and its owner.
/// Never serialized to API clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AvatarRecord {
    pub id: u64,
    pub student_id: u64,
    pub file_path: String,
    pub file_size: u64,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl From<&AvatarRecord> for Avatar {
    fn from(record: &AvatarRecord) -> Self {
        Self {
            id: record.id,
            file_path: record.file_path.clone(),
            file_size: record.file_size,
            media_type: record.media_type.clone(),
        }
    }
}

/// A student reduced to what the printing demonstrations need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedItem {
    pub id: u64,
    pub name: String,
}

impl NamedItem {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&Student> for NamedItem {
    fn from(student: &Student) -> Self {
        Self::new(student.id, student.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_serializes_camel_case() {
        let student = Student {
            id: 1,
            name: "Harry".to_string(),
            age: 17,
            faculty_id: Some(2),
        };
        assert_eq!(
            serde_json::to_value(&student).unwrap(),
            json!({ "id": 1, "name": "Harry", "age": 17, "facultyId": 2 })
        );
    }

    #[test]
    fn test_student_payload_without_faculty() {
        let payload: StudentPayload =
            serde_json::from_value(json!({ "name": "Luna", "age": 16 })).unwrap();
        assert_eq!(payload.faculty_id, None);
    }

    #[test]
    fn test_avatar_view_hides_data() {
        let record = AvatarRecord {
            id: 4,
            student_id: 9,
            file_path: "avatars/9.png".to_string(),
            file_size: 3,
            media_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        };
        let value = serde_json::to_value(Avatar::from(&record)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 4,
                "filePath": "avatars/9.png",
                "fileSize": 3,
                "mediaType": "image/png"
            })
        );
    }
}
