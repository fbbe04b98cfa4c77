// Startup catalog: the eight dogs from the swipe page plus two demo accounts

use super::models::{NewAnimal, NewUser, Species, UserType};
use super::repository::{Repository, StoreResult};

pub const DEMO_SHELTER_EMAIL: &str = "ong@petmatch.local";
pub const DEMO_CLIENT_EMAIL: &str = "cliente@petmatch.local";
pub const DEMO_PASSWORD: &str = "petmatch";

struct CatalogEntry {
    name: &'static str,
    age: &'static str,
    breed: &'static str,
    location: &'static str,
    characteristics: [&'static str; 3],
    bio: &'static str,
    size: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Luna",
        age: "2 anos",
        breed: "Golden Retriever",
        location: "São Paulo, SP",
        characteristics: ["Carinhosa", "Brincalhona", "Obediente"],
        bio: "Oi! Sou a Luna e adoro brincar no parque. Sou muito carinhosa e amo fazer novos amigos. Procuro uma família que goste de aventuras!",
        size: "Grande",
    },
    CatalogEntry {
        name: "Max",
        age: "4 anos",
        breed: "Labrador",
        location: "Rio de Janeiro, RJ",
        characteristics: ["Leal", "Energético", "Inteligente"],
        bio: "Eu sou o Max! Adoro nadar e correr na praia. Sou muito leal e protetor da minha família. Que tal me dar uma chance?",
        size: "Grande",
    },
    CatalogEntry {
        name: "Bella",
        age: "1 ano",
        breed: "Border Collie",
        location: "Belo Horizonte, MG",
        characteristics: ["Esperta", "Ativa", "Carinhosa"],
        bio: "Sou a Bella e sou super esperta! Aprendo truques rapidinho e adoro brincar de buscar a bolinha. Preciso de uma família ativa!",
        size: "Médio",
    },
    CatalogEntry {
        name: "Thor",
        age: "3 anos",
        breed: "Pastor Alemão",
        location: "Curitiba, PR",
        characteristics: ["Protetor", "Corajoso", "Leal"],
        bio: "Eu sou o Thor! Sou um guardião nato, mas também muito carinhoso com quem amo. Procuro uma família que me dê muito amor e atenção.",
        size: "Grande",
    },
    CatalogEntry {
        name: "Mia",
        age: "6 meses",
        breed: "Poodle",
        location: "Porto Alegre, RS",
        characteristics: ["Fofa", "Brincalhona", "Pequena"],
        bio: "Oi, eu sou a Mia! Sou pequenininha mas cheia de energia. Adoro brincar e fazer travessuras. Quem quer me mimar muito?",
        size: "Pequeno",
    },
    CatalogEntry {
        name: "Rex",
        age: "5 anos",
        breed: "Rottweiler",
        location: "Brasília, DF",
        characteristics: ["Forte", "Protetor", "Carinhoso"],
        bio: "Sou o Rex! Posso parecer intimidador, mas sou um gigante gentil. Adoro crianças e sou muito protetor da minha família.",
        size: "Grande",
    },
    CatalogEntry {
        name: "Nina",
        age: "3 anos",
        breed: "Beagle",
        location: "Salvador, BA",
        characteristics: ["Curiosa", "Amigável", "Aventureira"],
        bio: "Eu sou a Nina! Adoro explorar e farejar tudo. Sou muito sociável e me dou bem com outros pets. Vamos ser amigos?",
        size: "Médio",
    },
    CatalogEntry {
        name: "Buddy",
        age: "7 anos",
        breed: "Vira-lata",
        location: "Recife, PE",
        characteristics: ["Sábio", "Calmo", "Leal"],
        bio: "Sou o Buddy, um senhor experiente! Já passei por muita coisa na vida e agora só quero um lar tranquilo para descansar e dar muito amor.",
        size: "Médio",
    },
];

/// Number of animals [`seed`] inserts
pub const CATALOG_SIZE: usize = CATALOG.len();

/// Populate an empty repository with the catalog and demo accounts.
pub fn seed(repo: &dyn Repository) -> StoreResult<()> {
    repo.add_user(NewUser {
        email: DEMO_SHELTER_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
        name: "ONG Amigos dos Animais".to_string(),
        user_type: UserType::Ong,
        phone: "(81) 3333-0000".to_string(),
        city: "Recife".to_string(),
    })?;
    repo.add_user(NewUser {
        email: DEMO_CLIENT_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
        name: "Beatriz Eduarda".to_string(),
        user_type: UserType::Client,
        phone: "(81) 99999-0000".to_string(),
        city: "Recife".to_string(),
    })?;

    for entry in CATALOG {
        let image = format!(
            "/placeholder.svg?height=400&width=400&text={}+{}",
            entry.name,
            entry.breed.replace(' ', "+")
        );
        repo.add_animal(NewAnimal {
            name: entry.name.to_string(),
            age: entry.age.to_string(),
            breed: entry.breed.to_string(),
            location: entry.location.to_string(),
            image: Some(image),
            characteristics: entry.characteristics.iter().map(|c| c.to_string()).collect(),
            bio: entry.bio.to_string(),
            size: entry.size.to_string(),
            species: Species::Dog,
            ong_id: None,
        })?;
    }

    tracing::debug!("Seeded {} animals and 2 demo accounts", CATALOG_SIZE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AnimalFilter, MemoryStore};

    #[test]
    fn test_seed_populates_catalog() {
        let store = MemoryStore::new();
        seed(&store).unwrap();

        let animals = store.list_animals(&AnimalFilter::default()).unwrap();
        assert_eq!(animals.len(), CATALOG_SIZE);
        assert_eq!(animals[0].name, "Luna");
        assert_eq!(animals[7].name, "Buddy");
        assert!(animals.iter().all(|a| a.ong_id.is_none()));

        let shelter = store
            .find_user_by_credentials(DEMO_SHELTER_EMAIL, DEMO_PASSWORD)
            .unwrap()
            .unwrap();
        assert_eq!(shelter.user_type, UserType::Ong);
    }
}
