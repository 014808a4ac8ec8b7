//! Client and animal operations.

use serde::Serialize;
use strsim::{jaro_winkler, normalized_levenshtein};
use tracing::{debug, info};

use super::{remove_where, replace_where, Store, StoreError, StoreResult};
use crate::models::{Animal, Client};

/// Minimum fuzzy score for a name to count as a match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

/// A client returned by a search, with its match score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientMatch {
    pub client: Client,
    /// 1.0 for exact substring hits, fuzzy similarity otherwise
    pub score: f64,
}

impl Store {
    // =========================================================================
    // Clients
    // =========================================================================

    /// Insert a new client.
    pub fn insert_client(&mut self, client: Client) -> StoreResult<()> {
        if client.name.trim().is_empty() {
            return Err(StoreError::Constraint("client name is required".into()));
        }
        if self.clients.iter().any(|c| c.id == client.id) {
            return Err(StoreError::Constraint(format!("duplicate client id {}", client.id)));
        }
        info!(client_id = %client.id, "Client created");
        self.clients.push(client);
        Ok(())
    }

    /// Get a client by ID.
    pub fn get_client(&self, id: &str) -> Option<Client> {
        self.clients.iter().find(|c| c.id == id).cloned()
    }

    /// Replace a client record.
    pub fn update_client(&mut self, client: Client) -> StoreResult<()> {
        if client.name.trim().is_empty() {
            return Err(StoreError::Constraint("client name is required".into()));
        }
        let id = client.id.clone();
        let mut client = client;
        client.touch();
        replace_where(&mut self.clients, client, &id, |c| c.id == id)?;
        debug!(client_id = %id, "Client updated");
        Ok(())
    }

    /// Delete a client with its animals and their appointments.
    pub fn delete_client(&mut self, id: &str) -> bool {
        if remove_where(&mut self.clients, |c| c.id == id) == 0 {
            return false;
        }

        let animal_ids: Vec<String> = self
            .animals
            .iter()
            .filter(|a| a.client_id == id)
            .map(|a| a.id.clone())
            .collect();
        remove_where(&mut self.animals, |a| a.client_id == id);
        let appointments = remove_where(&mut self.appointments, |a| animal_ids.contains(&a.animal_id));

        info!(
            client_id = %id,
            animals = animal_ids.len(),
            appointments,
            "Client deleted"
        );
        true
    }

    /// All clients in insertion order.
    pub fn list_clients(&self) -> Vec<Client> {
        self.clients.clone()
    }

    /// Search clients by name, CPF or phone.
    ///
    /// Substring hits on name, CPF digits or phone digits score 1.0; other
    /// names are scored by fuzzy similarity against the whole name and each
    /// of its words. A blank query returns every client.
    pub fn search_clients(&self, query: &str, limit: usize) -> Vec<ClientMatch> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self
                .clients
                .iter()
                .take(limit)
                .map(|client| ClientMatch {
                    client: client.clone(),
                    score: 1.0,
                })
                .collect();
        }
        let query_digits: String = query.chars().filter(char::is_ascii_digit).collect();

        let mut matches: Vec<ClientMatch> = self
            .clients
            .iter()
            .filter_map(|client| {
                let score = score_client(client, &query, &query_digits);
                (score >= FUZZY_MATCH_THRESHOLD).then(|| ClientMatch {
                    client: client.clone(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.client.name.cmp(&b.client.name))
        });
        matches.truncate(limit);
        matches
    }

    // =========================================================================
    // Animals
    // =========================================================================

    /// Insert a new animal. Its client must exist.
    pub fn insert_animal(&mut self, animal: Animal) -> StoreResult<()> {
        if animal.name.trim().is_empty() {
            return Err(StoreError::Constraint("animal name is required".into()));
        }
        if !self.clients.iter().any(|c| c.id == animal.client_id) {
            return Err(StoreError::NotFound(animal.client_id.clone()));
        }
        if self.animals.iter().any(|a| a.id == animal.id) {
            return Err(StoreError::Constraint(format!("duplicate animal id {}", animal.id)));
        }
        info!(animal_id = %animal.id, client_id = %animal.client_id, "Animal created");
        self.animals.push(animal);
        Ok(())
    }

    /// Get an animal by ID.
    pub fn get_animal(&self, id: &str) -> Option<Animal> {
        self.animals.iter().find(|a| a.id == id).cloned()
    }

    /// Replace an animal record. Moving it to another client requires that
    /// client to exist.
    pub fn update_animal(&mut self, animal: Animal) -> StoreResult<()> {
        if !self.clients.iter().any(|c| c.id == animal.client_id) {
            return Err(StoreError::NotFound(animal.client_id.clone()));
        }
        let id = animal.id.clone();
        let mut animal = animal;
        animal.touch();
        replace_where(&mut self.animals, animal, &id, |a| a.id == id)?;
        debug!(animal_id = %id, "Animal updated");
        Ok(())
    }

    /// Delete an animal and its appointments.
    pub fn delete_animal(&mut self, id: &str) -> bool {
        if remove_where(&mut self.animals, |a| a.id == id) == 0 {
            return false;
        }
        remove_where(&mut self.appointments, |a| a.animal_id == id);
        info!(animal_id = %id, "Animal deleted");
        true
    }

    /// Animals owned by a client.
    pub fn list_animals_for_client(&self, client_id: &str) -> Vec<Animal> {
        self.animals
            .iter()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect()
    }

    /// All animals in insertion order.
    pub fn list_all_animals(&self) -> Vec<Animal> {
        self.animals.clone()
    }
}

fn score_client(client: &Client, query: &str, query_digits: &str) -> f64 {
    let name = client.name.to_lowercase();
    if name.contains(query) {
        return 1.0;
    }

    // Digit searches need a few digits to avoid matching everyone.
    if query_digits.len() >= 3 {
        let digits_of = |value: &Option<String>| -> String {
            value
                .as_deref()
                .unwrap_or_default()
                .chars()
                .filter(char::is_ascii_digit)
                .collect()
        };
        if digits_of(&client.cpf).contains(query_digits)
            || digits_of(&client.phone).contains(query_digits)
        {
            return 1.0;
        }
    }

    std::iter::once(name.as_str())
        .chain(name.split_whitespace())
        .map(|candidate| fuzzy_match(candidate, query))
        .fold(0.0, f64::max)
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler weighted for prefix typos, Levenshtein for overall shape
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}
