use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::models::{
    Action, ActionKind, Animal, AnimalFilter, Id, Match, MatchFilter, MatchStatus, Message,
    NewAction, NewAnimal, NewMessage, NewUser, Species, Stats, StatsScope, User, UserType,
};
use super::repository::{Repository, StoreError, StoreResult};

/// Monotonic id source. Starts at 1 and never reuses a value, even after deletes.
#[derive(Debug, Default)]
struct Counter(Id);

impl Counter {
    fn next(&mut self) -> Id {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    animals: Vec<Animal>,
    actions: Vec<Action>,
    matches: Vec<Match>,
    messages: Vec<Message>,

    user_ids: Counter,
    animal_ids: Counter,
    action_ids: Counter,
    match_ids: Counter,
    message_ids: Counter,
}

impl Collections {
    fn animal_owner(&self, animal_id: Id) -> Option<Id> {
        self.animals
            .iter()
            .find(|a| a.id == animal_id)
            .and_then(|a| a.ong_id)
    }
}

/// In-memory repository. Every operation is a linear scan under one lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Collections>> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Repository for MemoryStore {
    fn add_user(&self, new: NewUser) -> StoreResult<User> {
        let mut db = self.lock()?;

        if db.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail(new.email));
        }

        let user = User {
            id: db.user_ids.next(),
            email: new.email,
            password: new.password,
            name: new.name,
            user_type: new.user_type,
            phone: new.phone,
            city: new.city,
        };
        db.users.push(user.clone());
        Ok(user)
    }

    fn find_user_by_credentials(&self, email: &str, password: &str) -> StoreResult<Option<User>> {
        let db = self.lock()?;
        Ok(db
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned())
    }

    fn find_user(&self, id: Id) -> StoreResult<Option<User>> {
        let db = self.lock()?;
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    fn user_count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.users.len())
    }

    fn add_animal(&self, new: NewAnimal) -> StoreResult<Animal> {
        let mut db = self.lock()?;
        let animal = new.into_animal(db.animal_ids.next());
        db.animals.push(animal.clone());
        Ok(animal)
    }

    fn list_animals(&self, filter: &AnimalFilter) -> StoreResult<Vec<Animal>> {
        let db = self.lock()?;
        Ok(db
            .animals
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn find_animal(&self, id: Id) -> StoreResult<Option<Animal>> {
        let db = self.lock()?;
        Ok(db.animals.iter().find(|a| a.id == id).cloned())
    }

    fn animal_count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.animals.len())
    }

    fn remove_animal_by_id(&self, id: Id) -> StoreResult<Animal> {
        let mut db = self.lock()?;
        let pos = db
            .animals
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::not_found("animal", id))?;
        Ok(db.animals.remove(pos))
    }

    fn record_action(&self, new: NewAction) -> StoreResult<(Action, Option<Match>)> {
        let mut db = self.lock()?;

        let action = Action {
            id: db.action_ids.next(),
            animal_id: new.animal_id,
            action: new.action,
            user_id: new.user_id,
            timestamp: Utc::now(),
        };
        db.actions.push(action.clone());

        // Outer None: no such animal. The owner is frozen into the match.
        let owner = db
            .animals
            .iter()
            .find(|a| a.id == new.animal_id)
            .map(|a| a.ong_id);
        let opened = match owner {
            Some(ong_id) if new.action == ActionKind::Adopt => {
                let m = Match {
                    id: db.match_ids.next(),
                    animal_id: action.animal_id,
                    user_id: action.user_id,
                    ong_id,
                    action_id: action.id,
                    status: MatchStatus::Pending,
                    created_at: action.timestamp,
                };
                db.matches.push(m.clone());
                Some(m)
            }
            _ => None,
        };

        Ok((action, opened))
    }

    fn list_actions(&self) -> StoreResult<Vec<Action>> {
        Ok(self.lock()?.actions.clone())
    }

    fn compute_stats(&self, scope: &StatsScope) -> StoreResult<Stats> {
        let db = self.lock()?;

        let in_scope = |a: &&Animal| scope.ong_id.is_none_or(|id| a.ong_id == Some(id));
        let counted_action = |act: &&Action| {
            scope
                .ong_id
                .is_none_or(|id| db.animal_owner(act.animal_id) == Some(id))
        };

        Ok(Stats {
            dogs: db
                .animals
                .iter()
                .filter(in_scope)
                .filter(|a| a.species == Species::Dog)
                .count(),
            cats: db
                .animals
                .iter()
                .filter(in_scope)
                .filter(|a| a.species == Species::Cat)
                .count(),
            adopted: db
                .actions
                .iter()
                .filter(counted_action)
                .filter(|a| a.action == ActionKind::Adopt)
                .count(),
            interested: db.actions.iter().filter(counted_action).count(),
        })
    }

    fn list_matches(&self, filter: &MatchFilter) -> StoreResult<Vec<Match>> {
        let db = self.lock()?;
        Ok(db
            .matches
            .iter()
            .filter(|m| filter.user_id.is_none_or(|id| m.user_id == id))
            .filter(|m| {
                filter
                    .ong_id
                    .is_none_or(|id| m.ong_id.is_none_or(|owner| owner == id))
            })
            .cloned()
            .collect())
    }

    fn find_match(&self, id: Id) -> StoreResult<Option<Match>> {
        let db = self.lock()?;
        Ok(db.matches.iter().find(|m| m.id == id).cloned())
    }

    fn approve_match(&self, id: Id) -> StoreResult<Match> {
        let mut db = self.lock()?;
        let m = db
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::not_found("match", id))?;
        m.status = MatchStatus::Approved;
        Ok(m.clone())
    }

    fn add_message(&self, new: NewMessage) -> StoreResult<Message> {
        let mut db = self.lock()?;

        if !db.matches.iter().any(|m| m.id == new.match_id) {
            return Err(StoreError::not_found("match", new.match_id));
        }

        let message = Message {
            id: db.message_ids.next(),
            match_id: new.match_id,
            sender_id: new.sender_id,
            sender_role: new.sender_role,
            text: new.text,
            timestamp: Utc::now(),
            read: false,
        };
        db.messages.push(message.clone());
        Ok(message)
    }

    fn list_messages(&self, match_id: Id) -> StoreResult<Vec<Message>> {
        let db = self.lock()?;
        Ok(db
            .messages
            .iter()
            .filter(|m| m.match_id == match_id)
            .cloned()
            .collect())
    }

    fn mark_read(&self, match_id: Id, reader: UserType) -> StoreResult<usize> {
        let mut db = self.lock()?;
        let mut changed = 0;
        for message in db
            .messages
            .iter_mut()
            .filter(|m| m.match_id == match_id && m.sender_role != reader && !m.read)
        {
            message.read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, password: &str, user_type: UserType) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            name: "Test".to_string(),
            user_type,
            phone: "0000".to_string(),
            city: "Recife".to_string(),
        }
    }

    fn new_animal(name: &str, species: Species, ong_id: Option<Id>) -> NewAnimal {
        NewAnimal {
            name: name.to_string(),
            age: "2 anos".to_string(),
            breed: "Vira-lata".to_string(),
            location: "Recife, PE".to_string(),
            image: None,
            characteristics: vec!["Calmo".to_string()],
            bio: "Oi!".to_string(),
            size: "Médio".to_string(),
            species,
            ong_id,
        }
    }

    fn act(animal_id: Id, action: ActionKind) -> NewAction {
        NewAction {
            animal_id,
            action,
            user_id: 1,
        }
    }

    #[test]
    fn test_ids_are_sequential_per_collection() {
        let store = MemoryStore::new();
        let u = store.add_user(new_user("a@x", "p", UserType::Client)).unwrap();
        let a1 = store.add_animal(new_animal("Luna", Species::Dog, None)).unwrap();
        let a2 = store.add_animal(new_animal("Mimi", Species::Cat, None)).unwrap();

        assert_eq!(u.id, 1);
        assert_eq!(a1.id, 1);
        assert_eq!(a2.id, 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let a1 = store.add_animal(new_animal("Luna", Species::Dog, None)).unwrap();
        store.remove_animal_by_id(a1.id).unwrap();
        let a2 = store.add_animal(new_animal("Max", Species::Dog, None)).unwrap();
        assert_eq!(a2.id, 2);
    }

    #[test]
    fn test_duplicate_email_leaves_store_unchanged() {
        let store = MemoryStore::new();
        store.add_user(new_user("ana@email.com", "1", UserType::Client)).unwrap();

        let err = store
            .add_user(new_user("ana@email.com", "2", UserType::Ong))
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateEmail("ana@email.com".to_string()));
        assert_eq!(store.user_count().unwrap(), 1);
    }

    #[test]
    fn test_credentials_are_exact_and_case_sensitive() {
        let store = MemoryStore::new();
        let user = store
            .add_user(new_user("ana@email.com", "Segredo", UserType::Client))
            .unwrap();

        assert_eq!(
            store.find_user_by_credentials("ana@email.com", "Segredo").unwrap(),
            Some(user)
        );
        assert!(store
            .find_user_by_credentials("ana@email.com", "segredo")
            .unwrap()
            .is_none());
        assert!(store
            .find_user_by_credentials("Ana@email.com", "Segredo")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_remove_missing_animal() {
        let store = MemoryStore::new();
        store.add_animal(new_animal("Luna", Species::Dog, None)).unwrap();

        let err = store.remove_animal_by_id(42).unwrap_err();
        assert_eq!(err, StoreError::not_found("animal", 42));
        assert_eq!(store.animal_count().unwrap(), 1);
    }

    #[test]
    fn test_stats_counts() {
        let store = MemoryStore::new();
        store.add_animal(new_animal("Luna", Species::Dog, None)).unwrap();
        store.add_animal(new_animal("Max", Species::Dog, None)).unwrap();
        store.add_animal(new_animal("Mimi", Species::Cat, None)).unwrap();

        for _ in 0..3 {
            store.record_action(act(1, ActionKind::Adopt)).unwrap();
        }
        for _ in 0..2 {
            store.record_action(act(2, ActionKind::Reject)).unwrap();
        }

        let stats = store.compute_stats(&StatsScope::default()).unwrap();
        assert_eq!(
            stats,
            Stats {
                dogs: 2,
                cats: 1,
                adopted: 3,
                interested: 5,
            }
        );
    }

    #[test]
    fn test_stats_scoped_to_shelter() {
        let store = MemoryStore::new();
        let mine = store.add_animal(new_animal("Luna", Species::Dog, Some(10))).unwrap();
        let theirs = store.add_animal(new_animal("Mimi", Species::Cat, Some(11))).unwrap();

        store.record_action(act(mine.id, ActionKind::Adopt)).unwrap();
        store.record_action(act(theirs.id, ActionKind::Adopt)).unwrap();
        store.record_action(act(theirs.id, ActionKind::Reject)).unwrap();

        let stats = store
            .compute_stats(&StatsScope { ong_id: Some(10) })
            .unwrap();
        assert_eq!(stats.dogs, 1);
        assert_eq!(stats.cats, 0);
        assert_eq!(stats.adopted, 1);
        assert_eq!(stats.interested, 1);
    }

    #[test]
    fn test_actions_on_missing_animals_are_kept() {
        let store = MemoryStore::new();
        let (action, opened) = store.record_action(act(99, ActionKind::Adopt)).unwrap();

        assert_eq!(action.animal_id, 99);
        assert!(opened.is_none());
        assert_eq!(store.list_actions().unwrap().len(), 1);
    }

    #[test]
    fn test_adopt_opens_pending_match() {
        let store = MemoryStore::new();
        let animal = store.add_animal(new_animal("Luna", Species::Dog, Some(5))).unwrap();

        let (_, opened) = store.record_action(act(animal.id, ActionKind::Adopt)).unwrap();
        let m = opened.unwrap();
        assert_eq!(m.status, MatchStatus::Pending);

        let (_, none) = store.record_action(act(animal.id, ActionKind::Reject)).unwrap();
        assert!(none.is_none());

        let for_shelter = store
            .list_matches(&MatchFilter {
                ong_id: Some(5),
                user_id: None,
            })
            .unwrap();
        assert_eq!(for_shelter, vec![m.clone()]);
        let other_shelter = store
            .list_matches(&MatchFilter {
                ong_id: Some(6),
                user_id: None,
            })
            .unwrap();
        assert!(other_shelter.is_empty());

        let approved = store.approve_match(m.id).unwrap();
        assert_eq!(approved.status, MatchStatus::Approved);
        assert_eq!(
            store.approve_match(m.id).unwrap().status,
            MatchStatus::Approved
        );
    }

    #[test]
    fn test_unowned_animal_matches_visible_to_every_shelter() {
        let store = MemoryStore::new();
        let animal = store.add_animal(new_animal("Buddy", Species::Dog, None)).unwrap();
        store.record_action(act(animal.id, ActionKind::Adopt)).unwrap();

        for ong_id in [5, 6] {
            let filter = MatchFilter {
                ong_id: Some(ong_id),
                user_id: None,
            };
            assert_eq!(store.list_matches(&filter).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_match_keeps_owner_after_animal_removed() {
        let store = MemoryStore::new();
        let animal = store.add_animal(new_animal("Mel", Species::Cat, Some(5))).unwrap();
        let (_, m) = store.record_action(act(animal.id, ActionKind::Adopt)).unwrap();
        assert_eq!(m.unwrap().ong_id, Some(5));

        store.remove_animal_by_id(animal.id).unwrap();

        let owner = MatchFilter {
            ong_id: Some(5),
            user_id: None,
        };
        let other = MatchFilter {
            ong_id: Some(6),
            user_id: None,
        };
        assert_eq!(store.list_matches(&owner).unwrap().len(), 1);
        assert!(store.list_matches(&other).unwrap().is_empty());
    }

    #[test]
    fn test_messages_and_read_marks() {
        let store = MemoryStore::new();
        let animal = store.add_animal(new_animal("Luna", Species::Dog, Some(5))).unwrap();
        let (_, m) = store.record_action(act(animal.id, ActionKind::Adopt)).unwrap();
        let m = m.unwrap();

        store
            .add_message(NewMessage {
                match_id: m.id,
                sender_id: 1,
                sender_role: UserType::Client,
                text: "Ela é vacinada?".to_string(),
            })
            .unwrap();
        store
            .add_message(NewMessage {
                match_id: m.id,
                sender_id: 5,
                sender_role: UserType::Ong,
                text: "Sim!".to_string(),
            })
            .unwrap();

        assert_eq!(store.mark_read(m.id, UserType::Ong).unwrap(), 1);
        assert_eq!(store.mark_read(m.id, UserType::Ong).unwrap(), 0);

        let messages = store.list_messages(m.id).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].read);
        assert!(!messages[1].read);
    }

    #[test]
    fn test_message_to_missing_match() {
        let store = MemoryStore::new();
        let err = store
            .add_message(NewMessage {
                match_id: 3,
                sender_id: 1,
                sender_role: UserType::Client,
                text: "oi".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, StoreError::not_found("match", 3));
    }
}
