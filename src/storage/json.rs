//! JSON file storage: one file per unit, replaced atomically on every save.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::traits::{CatalogSnapshot, Storage, Unit};
use crate::domain::Record;
use crate::error::{LibrisError, Result};
use crate::id::IdSnapshot;

/// JSON-file storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    base_path: PathBuf,
    pretty: bool,
}

impl JsonStorage {
    /// Create a new JsonStorage at the given path, creating the directory if needed.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path, pretty: true })
    }

    /// Write compact single-line JSON instead of indented JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a unit.
    pub fn unit_path(&self, unit: Unit) -> PathBuf {
        self.base_path.join(unit.file_name())
    }

    fn temp_path(&self, unit: Unit) -> PathBuf {
        self.base_path.join(format!("{}.tmp", unit.file_name()))
    }

    /// Read a unit's raw bytes, `None` if it does not exist.
    fn read_unit(&self, unit: Unit) -> Result<Option<Vec<u8>>> {
        match fs::read(self.unit_path(unit)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LibrisError::PersistenceRead {
                unit,
                reason: e.to_string(),
            }),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn encode_records<R: Record>(&self, records: &[R]) -> Result<Vec<u8>> {
        let maps = records.iter().map(R::to_map).collect::<Result<Vec<_>>>()?;
        self.encode(&maps)
    }

    /// Write every unit to its temporary file, then rename each into place.
    ///
    /// Nothing is renamed until all temporaries are written, so a failed
    /// write leaves every live file untouched.
    fn write_units(&self, units: &[(Unit, Vec<u8>)]) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        for (unit, bytes) in units {
            let write = || -> std::io::Result<()> {
                let mut file = File::create(self.temp_path(*unit))?;
                file.write_all(bytes)?;
                file.sync_all()
            };
            if let Err(source) = write() {
                self.remove_temporaries(units);
                return Err(LibrisError::PersistenceWrite { unit: *unit, source });
            }
        }

        for (unit, _) in units {
            if let Err(source) = fs::rename(self.temp_path(*unit), self.unit_path(*unit)) {
                self.remove_temporaries(units);
                return Err(LibrisError::PersistenceWrite { unit: *unit, source });
            }
        }

        log::debug!("Wrote {} unit(s) to {}", units.len(), self.base_path.display());
        Ok(())
    }

    /// Best-effort removal of any temporary files left by a failed write.
    fn remove_temporaries(&self, units: &[(Unit, Vec<u8>)]) {
        for (unit, _) in units {
            let path = self.temp_path(*unit);
            if path.is_file() {
                if let Err(e) = fs::remove_file(&path) {
                    log::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl Storage for JsonStorage {
    fn load<R: Record>(&self) -> Result<Vec<R>> {
        let unit = Unit::of(R::KIND);
        let Some(bytes) = self.read_unit(unit)? else {
            return Ok(Vec::new());
        };

        let corrupt = |e: serde_json::Error| LibrisError::PersistenceRead {
            unit,
            reason: e.to_string(),
        };

        let maps: Vec<Map<String, Value>> = serde_json::from_slice(&bytes).map_err(corrupt)?;
        let mut records = Vec::with_capacity(maps.len());
        for map in maps {
            let record = R::from_map(map).map_err(|e| LibrisError::PersistenceRead {
                unit,
                reason: e.to_string(),
            })?;
            records.push(record);
        }

        log::debug!("Loaded {} record(s) from {}", records.len(), unit);
        Ok(records)
    }

    fn load_counters(&self) -> Result<Option<IdSnapshot>> {
        let unit = Unit::Counters;
        let Some(bytes) = self.read_unit(unit)? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_slice(&bytes).map_err(|e| LibrisError::PersistenceRead {
            unit,
            reason: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        let bytes = self.encode_records(records)?;
        self.write_units(&[(Unit::of(R::KIND), bytes)])
    }

    fn save_counters(&self, counters: &IdSnapshot) -> Result<()> {
        let bytes = self.encode(counters)?;
        self.write_units(&[(Unit::Counters, bytes)])
    }

    fn save_all(&self, snapshot: &CatalogSnapshot<'_>) -> Result<()> {
        // Serialize everything before touching disk
        let units = [
            (Unit::Members, self.encode_records(snapshot.members)?),
            (Unit::Titles, self.encode_records(snapshot.titles)?),
            (Unit::Loans, self.encode_records(snapshot.loans)?),
            (Unit::Counters, self.encode(&snapshot.counters)?),
        ];
        self.write_units(&units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Loan, Member, Title};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (JsonStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    fn member(id: u64, name: &str) -> Member {
        let mut member = Member::new(name, format!("{}@x.com", name.to_lowercase()), "");
        member.id = id;
        member
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let storage = JsonStorage::new(&nested).unwrap();
        assert!(storage.base_path().is_dir());
    }

    #[test]
    fn test_load_missing_unit_is_empty() {
        let (storage, _temp) = create_test_storage();
        let members: Vec<Member> = storage.load().unwrap();
        assert!(members.is_empty());
        assert_eq!(storage.load_counters().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (storage, _temp) = create_test_storage();
        let members = vec![member(1, "Ana"), member(4, "Bo"), member(2, "Cy")];

        storage.save(&members).unwrap();
        let loaded: Vec<Member> = storage.load().unwrap();

        assert_eq!(loaded, members);
    }

    #[test]
    fn test_loans_round_trip_with_dates() {
        let (storage, _temp) = create_test_storage();
        let mut loan = Loan::new(1, 2, NaiveDate::from_ymd_opt(2024, 1, 5));
        loan.id = 1;
        let mut returned = Loan::new(1, 3, NaiveDate::from_ymd_opt(2024, 1, 6));
        returned.id = 2;
        returned.mark_returned(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let loans = vec![loan, returned];

        storage.save(&loans).unwrap();
        let loaded: Vec<Loan> = storage.load().unwrap();

        assert_eq!(loaded, loans);
    }

    #[test]
    fn test_corrupt_unit_reports_read_error() {
        let (storage, _temp) = create_test_storage();
        fs::write(storage.unit_path(Unit::Titles), "{ not json").unwrap();

        let result: Result<Vec<Title>> = storage.load();
        assert!(matches!(
            result,
            Err(LibrisError::PersistenceRead { unit: Unit::Titles, .. })
        ));
    }

    #[test]
    fn test_malformed_record_reports_read_error() {
        let (storage, _temp) = create_test_storage();
        fs::write(storage.unit_path(Unit::Members), r#"[{"id": "one"}]"#).unwrap();

        let result: Result<Vec<Member>> = storage.load();
        assert!(matches!(result, Err(LibrisError::PersistenceRead { .. })));
    }

    #[test]
    fn test_counters_round_trip() {
        let (storage, _temp) = create_test_storage();
        let counters = IdSnapshot {
            member_id: 3,
            title_id: 9,
            loan_id: 1,
        };
        storage.save_counters(&counters).unwrap();
        assert_eq!(storage.load_counters().unwrap(), Some(counters));
    }

    #[test]
    fn test_save_all_writes_every_unit_and_no_temporaries() {
        let (storage, temp) = create_test_storage();
        let members = vec![member(1, "Ana")];
        let snapshot = CatalogSnapshot {
            members: &members,
            titles: &[],
            loans: &[],
            counters: IdSnapshot {
                member_id: 1,
                title_id: 0,
                loan_id: 0,
            },
        };

        storage.save_all(&snapshot).unwrap();

        for unit in [Unit::Members, Unit::Titles, Unit::Loans, Unit::Counters] {
            assert!(storage.unit_path(unit).exists(), "{} missing", unit);
        }
        let leftovers = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_failed_write_leaves_no_temporaries() {
        let (storage, temp) = create_test_storage();
        storage.save(&[member(1, "Ana")]).unwrap();
        // A directory where the loans temporary goes makes that write fail
        fs::create_dir(storage.base_path().join("loans.json.tmp")).unwrap();

        let members = vec![member(1, "Ana"), member(2, "Bo")];
        let snapshot = CatalogSnapshot {
            members: &members,
            titles: &[],
            loans: &[],
            counters: IdSnapshot::default(),
        };
        let result = storage.save_all(&snapshot);

        assert!(matches!(
            result,
            Err(LibrisError::PersistenceWrite { unit: Unit::Loans, .. })
        ));
        assert!(!temp.path().join("members.json.tmp").exists());
        assert!(!temp.path().join("titles.json.tmp").exists());
        // Live files are untouched
        let loaded: Vec<Member> = storage.load().unwrap();
        assert_eq!(loaded, vec![member(1, "Ana")]);
    }

    #[test]
    fn test_save_overwrites_whole_collection() {
        let (storage, _temp) = create_test_storage();
        storage.save(&[member(1, "Ana"), member(2, "Bo")]).unwrap();
        storage.save(&[member(2, "Bo")]).unwrap();

        let loaded: Vec<Member> = storage.load().unwrap();
        assert_eq!(loaded, vec![member(2, "Bo")]);
    }

    #[test]
    fn test_pretty_output_is_human_readable() {
        let (storage, _temp) = create_test_storage();
        storage.save(&[member(1, "Ana")]).unwrap();
        let text = fs::read_to_string(storage.unit_path(Unit::Members)).unwrap();
        assert!(text.contains("\n  {"));
        let id_pos = text.find("\"id\"").unwrap();
        let phone_pos = text.find("\"phone\"").unwrap();
        assert!(id_pos < phone_pos);
    }

    #[test]
    fn test_compact_output_is_single_line() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(temp_dir.path()).unwrap().compact();
        storage.save(&[member(1, "Ana")]).unwrap();
        let text = fs::read_to_string(storage.unit_path(Unit::Members)).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let storage = JsonStorage::new(temp_dir.path()).unwrap();
            storage.save(&[member(7, "Dee")]).unwrap();
        }

        {
            let storage = JsonStorage::new(temp_dir.path()).unwrap();
            let loaded: Vec<Member> = storage.load().unwrap();
            assert_eq!(loaded.len(), 1);
            assert_eq!(loaded[0].name, "Dee");
        }
    }
}
