//! # Offline Place Search
//!
//! A static list of popular Iberian beaches, used when the geocoding service
//! is unreachable or finds nothing. Matching is a case-insensitive substring
//! test over name, display name, region and country.

use crate::search::SearchResult;

struct Beach {
    name: &'static str,
    display_name: &'static str,
    latitude: f64,
    longitude: f64,
    country: &'static str,
    region: &'static str,
}

const fn beach(name: &'static str, latitude: f64, longitude: f64, country: &'static str, region: &'static str) -> Beach {
    Beach {
        name,
        display_name: name,
        latitude,
        longitude,
        country,
        region,
    }
}

const IBERIAN_BEACHES: &[Beach] = &[
    // Portugal: Lisboa / Setúbal
    beach("Costa da Caparica", 38.6413, -9.2386, "Portugal", "Setúbal"),
    beach("Praia do Guincho", 38.7329, -9.4730, "Portugal", "Lisboa"),
    beach("Praia de Carcavelos", 38.6795, -9.3326, "Portugal", "Lisboa"),
    beach("Praia de Cascais", 38.7000, -9.4167, "Portugal", "Lisboa"),
    beach("Praia de Estoril", 38.7167, -9.4000, "Portugal", "Lisboa"),
    beach("Praia de Ericeira", 38.9667, -9.4167, "Portugal", "Lisboa"),
    beach("Praia de Tróia", 38.4833, -8.8833, "Portugal", "Setúbal"),
    beach("Praia de Sesimbra", 38.4333, -9.1000, "Portugal", "Setúbal"),
    // Portugal: Algarve
    beach("Praia da Marinha", 37.0869, -8.4167, "Portugal", "Algarve"),
    beach("Praia de Benagil", 37.0897, -8.4247, "Portugal", "Algarve"),
    beach("Praia dos Coelhos", 37.0869, -8.4167, "Portugal", "Algarve"),
    beach("Praia da Rocha", 37.1189, -8.5333, "Portugal", "Algarve"),
    beach("Praia de Lagos", 37.1028, -8.6733, "Portugal", "Algarve"),
    beach("Praia de Albufeira", 37.0894, -8.2500, "Portugal", "Algarve"),
    beach("Praia de Faro", 37.0144, -7.9350, "Portugal", "Algarve"),
    beach("Praia de Tavira", 37.1278, -7.6472, "Portugal", "Algarve"),
    beach("Praia de Sagres", 37.0083, -8.9433, "Portugal", "Algarve"),
    beach("Praia de Carvoeiro", 37.1000, -8.4667, "Portugal", "Algarve"),
    beach("Praia de Portimão", 37.1333, -8.5333, "Portugal", "Algarve"),
    beach("Praia de Vilamoura", 37.0833, -8.1167, "Portugal", "Algarve"),
    beach("Praia de Quarteira", 37.0667, -8.1000, "Portugal", "Algarve"),
    beach("Praia de Olhos de Água", 37.0833, -8.1833, "Portugal", "Algarve"),
    beach("Praia de São Rafael", 37.0667, -8.2500, "Portugal", "Algarve"),
    beach("Praia de Galé", 37.0833, -8.2333, "Portugal", "Algarve"),
    beach("Praia de Armação de Pêra", 37.1000, -8.3500, "Portugal", "Algarve"),
    beach("Praia de Ferragudo", 37.1167, -8.5167, "Portugal", "Algarve"),
    beach("Praia de Alvor", 37.1333, -8.6000, "Portugal", "Algarve"),
    beach("Praia de Burgau", 37.0667, -8.7833, "Portugal", "Algarve"),
    beach("Praia de Salema", 37.0667, -8.8167, "Portugal", "Algarve"),
    beach("Praia de Luz", 37.0833, -8.7333, "Portugal", "Algarve"),
    // Portugal: Alentejo coast
    beach("Praia de Monte Clérigo", 37.3167, -8.8500, "Portugal", "Alentejo"),
    beach("Praia de Odeceixe", 37.4333, -8.7833, "Portugal", "Alentejo"),
    beach("Praia de Zambujeira do Mar", 37.5167, -8.7833, "Portugal", "Alentejo"),
    beach("Praia de Vila Nova de Milfontes", 37.7167, -8.7833, "Portugal", "Alentejo"),
    // Portugal: Centro / Norte
    beach("Praia de Peniche", 39.3500, -9.3833, "Portugal", "Leiria"),
    beach("Praia de Nazaré", 39.6167, -9.0833, "Portugal", "Leiria"),
    beach("Praia de Figueira da Foz", 40.1500, -8.8500, "Portugal", "Coimbra"),
    beach("Praia de Aveiro", 40.6333, -8.6500, "Portugal", "Aveiro"),
    beach("Praia de Espinho", 41.0167, -8.6333, "Portugal", "Aveiro"),
    beach("Praia de Matosinhos", 41.1833, -8.7000, "Portugal", "Porto"),
    beach("Praia de Póvoa de Varzim", 41.3833, -8.7667, "Portugal", "Porto"),
    beach("Praia de Viana do Castelo", 41.7000, -8.8333, "Portugal", "Viana do Castelo"),
    // Spain
    beach("Barceloneta Beach", 41.3790, 2.1893, "Spain", "Catalonia"),
    beach("Sitges", 41.2370, 1.8039, "Spain", "Catalonia"),
    Beach {
        name: "La Concha",
        display_name: "La Concha (San Sebastián)",
        latitude: 43.3183,
        longitude: -1.9869,
        country: "Spain",
        region: "Basque Country",
    },
    Beach {
        name: "La Caleta",
        display_name: "La Caleta (Cádiz)",
        latitude: 36.5363,
        longitude: -6.2994,
        country: "Spain",
        region: "Andalusia",
    },
    beach("Tarifa", 36.0130, -5.6060, "Spain", "Andalusia"),
    beach("Playa de la Malvarrosa", 39.4780, -0.3236, "Spain", "Valencia"),
    beach("Playa de Bolonia", 36.0888, -5.7736, "Spain", "Andalusia"),
    beach("Playa de Las Catedrales", 43.5545, -7.1573, "Spain", "Galicia"),
];

/// Beaches whose name, display name, region or country contains `term`,
/// ignoring case, in list order and capped at `limit`.
pub fn search(term: &str, limit: usize) -> Vec<SearchResult> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    IBERIAN_BEACHES
        .iter()
        .filter(|b| {
            [b.name, b.display_name, b.region, b.country]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .take(limit)
        .map(|b| SearchResult {
            name: b.name.to_string(),
            display_name: b.display_name.to_string(),
            latitude: b.latitude,
            longitude: b.longitude,
            country: b.country.to_string(),
            region: Some(b.region.to_string()),
        })
        .collect()
}
