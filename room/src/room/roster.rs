use tracing::warn;

use super::config::Validation;
use super::error::{ErrorKind, RoomResult};

/// Ordered, case-insensitively unique player names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster(Vec<String>);

impl Roster {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    fn contains(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.0.iter().any(|p| p.to_lowercase() == lower)
    }

    pub fn add(&mut self, raw: &str, validation: Validation) -> RoomResult<()> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ErrorKind::EmptyName);
        }
        let name = match validation {
            Validation::Strict => trimmed.to_string(),
            Validation::Lenient => capitalize(trimmed),
        };
        if self.contains(&name) {
            return Err(ErrorKind::DuplicateName);
        }
        self.0.push(name);
        Ok(())
    }

    pub fn remove(&mut self, idx: usize) -> RoomResult<String> {
        if idx >= self.0.len() {
            return Err(ErrorKind::NoSuchPlayer(idx));
        }
        Ok(self.0.remove(idx))
    }

    /// Splice-move: take the player out at `from`, insert at `to` in what is
    /// left. Both indices must address the current list.
    pub fn reorder(&mut self, from: usize, to: usize) -> RoomResult<()> {
        let len = self.0.len();
        if from >= len {
            return Err(ErrorKind::NoSuchPlayer(from));
        }
        if to >= len {
            return Err(ErrorKind::NoSuchPlayer(to));
        }
        if from == to {
            return Ok(());
        }
        let moved = self.0.remove(from);
        self.0.insert(to, moved);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Rebuilds a roster from its stored JSON. Anything unreadable yields an
    /// empty roster.
    pub fn from_stored(stored: Option<&str>) -> Self {
        let stored = match stored {
            Some(s) => s,
            None => return Self::default(),
        };
        let parsed: serde_json::Value = match serde_json::from_str(stored) {
            Ok(v) => v,
            Err(err) => {
                warn!("Unable to load saved players: {}", err);
                return Self::default();
            }
        };
        let entries = match parsed.as_array() {
            Some(entries) => entries,
            None => {
                warn!("Saved players are not a list, starting blank");
                return Self::default();
            }
        };
        let mut roster = Self::default();
        for name in entries.iter().filter_map(|e| e.as_str()).map(str::trim) {
            if !name.is_empty() && !roster.contains(name) {
                roster.0.push(name.to_string());
            }
        }
        roster
    }

    pub fn to_stored(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Roster {
        Roster(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn add_trims_and_appends() {
        let mut r = Roster::default();
        r.add("  Amy ", Validation::Strict).unwrap();
        r.add("Bo", Validation::Strict).unwrap();
        assert_eq!(r, roster(&["Amy", "Bo"]));
    }

    #[test]
    fn add_rejects_blank_names() {
        let mut r = Roster::default();
        assert_eq!(r.add("   ", Validation::Strict), Err(ErrorKind::EmptyName));
        assert_eq!(r.add("", Validation::Lenient), Err(ErrorKind::EmptyName));
        assert!(r.is_empty());
    }

    #[test]
    fn add_rejects_case_insensitive_duplicates() {
        let mut r = roster(&["Amy"]);
        assert_eq!(r.add("amy", Validation::Strict), Err(ErrorKind::DuplicateName));
        assert_eq!(r.add(" AMY ", Validation::Lenient), Err(ErrorKind::DuplicateName));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn lenient_add_capitalizes() {
        let mut r = Roster::default();
        r.add("bo", Validation::Lenient).unwrap();
        r.add("élodie", Validation::Lenient).unwrap();
        r.add("cy", Validation::Strict).unwrap();
        assert_eq!(r, roster(&["Bo", "Élodie", "cy"]));
    }

    #[test]
    fn remove_out_of_range_is_refused() {
        let mut r = roster(&["Amy", "Bo"]);
        assert_eq!(r.remove(2), Err(ErrorKind::NoSuchPlayer(2)));
        assert_eq!(r.remove(0), Ok("Amy".to_string()));
        assert_eq!(r, roster(&["Bo"]));
    }

    #[test]
    fn reorder_uses_splice_semantics() {
        let mut r = roster(&["A", "B", "C", "D"]);
        r.reorder(0, 2).unwrap();
        assert_eq!(r, roster(&["B", "C", "A", "D"]));
        r.reorder(3, 0).unwrap();
        assert_eq!(r, roster(&["D", "B", "C", "A"]));
    }

    #[test]
    fn reorder_then_inverse_restores_order() {
        let original = roster(&["A", "B", "C", "D", "E"]);
        for from in 0..original.len() {
            for to in 0..original.len() {
                let mut r = original.clone();
                r.reorder(from, to).unwrap();
                r.reorder(to, from).unwrap();
                assert_eq!(r, original, "move {} -> {}", from, to);
            }
        }
    }

    #[test]
    fn reorder_invalid_indices_leave_roster_alone() {
        let mut r = roster(&["A", "B", "C"]);
        assert_eq!(r.reorder(3, 0), Err(ErrorKind::NoSuchPlayer(3)));
        assert_eq!(r.reorder(0, 7), Err(ErrorKind::NoSuchPlayer(7)));
        assert_eq!(r.reorder(1, 1), Ok(()));
        assert_eq!(r, roster(&["A", "B", "C"]));
    }

    #[test]
    fn stored_roster_survives_a_round_trip() {
        let r = roster(&["Amy", "Bo", "Cy"]);
        let stored = r.to_stored().unwrap();
        assert_eq!(stored, r#"["Amy","Bo","Cy"]"#);
        assert_eq!(Roster::from_stored(Some(&stored)), r);
    }

    #[test]
    fn load_drops_malformed_entries() {
        let r = Roster::from_stored(Some(r#"[" Amy ", 3, null, "", "Bo", "amy", {"n": 1}]"#));
        assert_eq!(r, roster(&["Amy", "Bo"]));
    }

    #[test]
    fn load_failures_start_blank() {
        assert_eq!(Roster::from_stored(None), Roster::default());
        assert_eq!(Roster::from_stored(Some("not json")), Roster::default());
        assert_eq!(Roster::from_stored(Some(r#"{"players": ["Amy"]}"#)), Roster::default());
    }
}
