use std::fs;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use hbnb_core::models::*;
use hbnb_core::storage::{FileStorage, ReloadPolicy, DEFAULT_FILE_PATH};
use hbnb_core::{ModelError, StorageError};
use serde_json::{json, Value};
use speculate2::speculate;

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("backing file should be readable");
    serde_json::from_str(&content).expect("backing file should be valid JSON")
}

fn serialized(storage: &FileStorage) -> Vec<(String, Value)> {
    storage
        .all()
        .iter()
        .map(|(key, record)| (key.clone(), Value::Object(record.to_dict())))
        .collect()
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("file.json");
        let mut storage = FileStorage::new(&path);
    }

    describe "defaults" {
        it "uses file.json as the conventional backing file" {
            assert_eq!(DEFAULT_FILE_PATH, "file.json");
            assert_eq!(storage.path(), path.as_path());
            assert_eq!(storage.policy(), ReloadPolicy::Lenient);
            assert!(storage.is_empty());
        }
    }

    describe "register" {
        it "stores the record under TypeName.id" {
            let record = Record::new(ModelKind::User);
            let id = record.id().to_string();

            let key = storage.register(record);

            assert_eq!(key, format!("User.{id}"));
            assert!(storage.contains(&key));
            assert_eq!(storage.find(ModelKind::User, &id).map(Record::id), Some(id.as_str()));
        }

        it "replaces an entry registered twice" {
            let mut record = Record::new(ModelKind::State);
            let key = storage.register(record.clone());
            record.set_attribute("name", "California").expect("name is writable");

            storage.register(record);

            assert_eq!(storage.len(), 1);
            assert_eq!(storage.get(&key).and_then(|r| r.attribute("name")), Some(json!("California")));
        }
    }

    describe "all" {
        it "filters by the key's type tag" {
            storage.create(ModelKind::User);
            storage.create(ModelKind::User);
            storage.create(ModelKind::City);

            assert_eq!(storage.all().len(), 3);
            assert_eq!(storage.all_of(ModelKind::User).count(), 2);
            assert_eq!(storage.count(Some(ModelKind::City)), 1);
            assert_eq!(storage.count(Some(ModelKind::Review)), 0);
            assert_eq!(storage.count(None), 3);
        }

        it "hands out live records" {
            let key = storage.create(ModelKind::Amenity);
            storage
                .get_mut(&key)
                .expect("record should exist")
                .set_attribute("name", "Wifi")
                .expect("name is writable");

            storage.save().expect("Failed to save");

            assert_eq!(read_json(&path)[&key]["name"], json!("Wifi"));
        }
    }

    describe "delete" {
        it "removes an existing entry" {
            let key = storage.create(ModelKind::Place);
            assert!(storage.delete(&key).is_some());
            assert!(!storage.contains(&key));
        }

        it "ignores an absent key" {
            storage.create(ModelKind::Place);
            assert!(storage.delete("Place.missing").is_none());
            assert_eq!(storage.len(), 1);
        }
    }

    describe "save" {
        it "writes every entry with its class tag" {
            let user = storage.create(ModelKind::User);
            let review = storage.create(ModelKind::Review);

            storage.save().expect("Failed to save");

            let data = read_json(&path);
            let entries = data.as_object().expect("top level should be an object");
            assert_eq!(entries.len(), 2);
            assert_eq!(data[&user]["__class__"], json!("User"));
            assert_eq!(data[&review]["__class__"], json!("Review"));
            assert_eq!(data[&review]["text"], json!(""));
        }

        it "indents with four spaces" {
            storage.create(ModelKind::State);
            storage.save().expect("Failed to save");

            let content = fs::read_to_string(&path).expect("Failed to read");
            assert!(content.starts_with("{\n    \"State."));
        }

        it "replaces the whole previous content" {
            let key = storage.create(ModelKind::State);
            storage.save().expect("Failed to save");
            storage.delete(&key);

            storage.save().expect("Failed to save");

            assert_eq!(read_json(&path), json!({}));
        }

        it "reports an unwritable location" {
            let blocker = dir.path().join("blocker");
            fs::write(&blocker, "not a directory").expect("Failed to write");
            let storage = FileStorage::new(blocker.join("file.json"));

            let err = storage.save().unwrap_err();

            assert!(matches!(err, StorageError::Io { .. }));
        }
    }

    describe "touch" {
        it "bumps updated_at and persists" {
            let key = storage.create(ModelKind::User);
            let created_at = storage.get(&key).expect("record should exist").base.created_at;
            sleep(Duration::from_millis(2));

            storage.touch(&key).expect("Failed to touch");

            let record = storage.get(&key).expect("record should exist");
            assert!(record.base.updated_at > created_at);
            assert_eq!(
                read_json(&path)[&key]["updated_at"],
                json!(format_timestamp(&record.base.updated_at))
            );
        }

        it "fails for an unknown key" {
            let err = storage.touch("User.missing").unwrap_err();
            assert!(matches!(err, StorageError::NotFound(key) if key == "User.missing"));
        }
    }

    describe "reload" {
        it "tolerates a missing backing file" {
            let report = storage.reload().expect("missing file is not an error");

            assert_eq!(report.loaded, 0);
            assert!(report.skipped.is_empty());
            assert!(storage.is_empty());
        }

        it "restores what was saved" {
            let key = storage.create(ModelKind::Place);
            {
                let place = storage.get_mut(&key).expect("record should exist");
                place.set_attribute("name", "Loft").expect("name is writable");
                place.set_attribute("pets", "no").expect("extra is writable");
            }
            storage.create(ModelKind::User);
            storage.save().expect("Failed to save");

            let mut restored = FileStorage::new(&path);
            let report = restored.reload().expect("Failed to reload");

            assert_eq!(report.loaded, 2);
            assert_eq!(serialized(&restored), serialized(&storage));
            assert_eq!(restored.get(&key), storage.get(&key));
        }

        it "is idempotent" {
            storage.create(ModelKind::City);
            storage.create(ModelKind::Amenity);
            storage.save().expect("Failed to save");

            let mut once = FileStorage::new(&path);
            once.reload().expect("Failed to reload");
            let mut twice = FileStorage::new(&path);
            twice.reload().expect("Failed to reload");
            twice.reload().expect("Failed to reload");

            assert_eq!(serialized(&once), serialized(&twice));
        }

        it "keeps the stored key even when the id disagrees" {
            fs::write(&path, json!({
                "User.stored-key": {
                    "__class__": "User",
                    "id": "other-id",
                    "created_at": "2017-09-28T21:03:54.052298",
                    "updated_at": "2017-09-28T21:03:54.052298"
                }
            }).to_string()).expect("Failed to write");

            storage.reload().expect("Failed to reload");

            assert!(storage.contains("User.stored-key"));
            assert!(!storage.contains("User.other-id"));
        }

        it "ignores keys without a type separator" {
            fs::write(&path, json!({
                "metadata": { "written_by": "hand" }
            }).to_string()).expect("Failed to write");

            let report = storage.reload().expect("Failed to reload");

            assert_eq!(report.loaded, 0);
            assert!(storage.is_empty());
        }

        it "skips unreadable entries by default" {
            fs::write(&path, json!({
                "User.good": {
                    "id": "good",
                    "created_at": "2017-09-28T21:03:54.052298",
                    "updated_at": "2017-09-28T21:03:54.052298"
                },
                "User.bad": {
                    "id": "bad",
                    "created_at": "not a timestamp",
                    "updated_at": "2017-09-28T21:03:54.052298"
                },
                "Flight.x": {
                    "id": "x",
                    "created_at": "2017-09-28T21:03:54.052298",
                    "updated_at": "2017-09-28T21:03:54.052298"
                }
            }).to_string()).expect("Failed to write");

            let report = storage.reload().expect("lenient reload should succeed");

            assert_eq!(report.loaded, 1);
            assert!(storage.contains("User.good"));
            let skipped: Vec<&str> = report.skipped.iter().map(|s| s.key.as_str()).collect();
            assert_eq!(skipped, vec!["Flight.x", "User.bad"]);
            assert!(matches!(report.skipped[0].error, ModelError::UnknownKind(_)));
            assert!(matches!(report.skipped[1].error, ModelError::InvalidTimestamp { .. }));
        }

        it "keeps skipped entries on save" {
            let place = json!({
                "__class__": "Place",
                "id": "p1",
                "created_at": "2017-09-28T21:03:54.052298",
                "updated_at": "2017-09-28T21:03:54.052298",
                "number_rooms": 3
            });
            let base = json!({
                "__class__": "BaseModel",
                "id": "b1",
                "created_at": "2017-09-28T21:03:54.052298",
                "updated_at": "2017-09-28T21:03:54.052298"
            });
            fs::write(&path, json!({
                "User.good": {
                    "id": "good",
                    "created_at": "2017-09-28T21:03:54.052298",
                    "updated_at": "2017-09-28T21:03:54.052298"
                },
                "Place.p1": place.clone(),
                "BaseModel.b1": base.clone(),
                "metadata": { "written_by": "hand" }
            }).to_string()).expect("Failed to write");

            let report = storage.reload().expect("lenient reload should succeed");
            assert_eq!(report.loaded, 1);
            assert_eq!(report.skipped.len(), 2);
            assert_eq!(storage.unreadable().len(), 3);

            let state = storage.create(ModelKind::State);
            storage.save().expect("Failed to save");

            let data = read_json(&path);
            let entries = data.as_object().expect("top level should be an object");
            assert_eq!(entries.len(), 5);
            assert_eq!(data["Place.p1"], place);
            assert_eq!(data["BaseModel.b1"], base);
            assert_eq!(data["metadata"], json!({ "written_by": "hand" }));
            assert!(entries.contains_key("User.good"));
            assert!(entries.contains_key(&state));
        }

        it "aborts on an unreadable entry in strict mode" {
            fs::write(&path, json!({
                "User.bad": {
                    "id": "bad",
                    "updated_at": "2017-09-28T21:03:54.052298"
                }
            }).to_string()).expect("Failed to write");
            let mut strict = FileStorage::new(&path).with_policy(ReloadPolicy::Strict);

            let err = strict.reload().unwrap_err();

            assert!(matches!(
                err,
                StorageError::Format { ref key, source: ModelError::MissingField("created_at") } if key == "User.bad"
            ));
        }

        it "fails on content that is not JSON" {
            fs::write(&path, "{ this is not json").expect("Failed to write");

            let err = storage.reload().unwrap_err();

            assert!(matches!(err, StorageError::Parse { .. }));
            assert!(storage.is_empty());
        }

        it "fails when the top level is not an object" {
            fs::write(&path, "[1, 2, 3]").expect("Failed to write");

            let err = storage.reload().unwrap_err();

            assert!(matches!(err, StorageError::InvalidLayout { .. }));
        }
    }
}
