//! Seed data for the fixture store

use chrono::{DateTime, TimeZone, Utc};
use cowork_core::models::{BillingPeriod, BlogPost, PricingPackage, Service, Space, SpaceId};

/// Service catalog
pub fn services() -> Vec<Service> {
    [
        ("wifi", "High-speed Wi-Fi"),
        ("coffee", "Free coffee & tea"),
        ("meeting-rooms", "Meeting rooms"),
        ("phone-booths", "Phone booths"),
        ("parking", "Parking"),
        ("24-7-access", "24/7 access"),
        ("kitchen", "Shared kitchen"),
        ("event-space", "Event space"),
        ("lockers", "Lockers"),
        ("printing", "Printing & scanning"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (tag, name))| Service {
        id: i as i64 + 1,
        service_id: tag.to_string(),
        display_name: name.to_string(),
    })
    .collect()
}

struct SeedSpace {
    id: i64,
    name: &'static str,
    city: &'static str,
    address: &'static str,
    lat: f64,
    lng: f64,
    rating: f64,
    description: &'static str,
    services: &'static [&'static str],
}

const SEED_SPACES: &[SeedSpace] = &[
    SeedSpace {
        id: 1,
        name: "Factory Görlitzer Park",
        city: "Berlin",
        address: "Lohmühlenstraße 65, 12435 Berlin",
        lat: 52.4934,
        lng: 13.4464,
        rating: 4.6,
        description: "Converted brewery with a large community kitchen and event hall.",
        services: &["wifi", "coffee", "meeting-rooms", "kitchen", "event-space", "lockers"],
    },
    SeedSpace {
        id: 2,
        name: "St. Oberholz",
        city: "Berlin",
        address: "Rosenthaler Str. 72A, 10119 Berlin",
        lat: 52.5296,
        lng: 13.4016,
        rating: 4.2,
        description: "Café on the ground floor, quiet desks upstairs.",
        services: &["wifi", "coffee", "phone-booths", "printing"],
    },
    SeedSpace {
        id: 3,
        name: "Second Home Lisboa",
        city: "Lisbon",
        address: "Mercado da Ribeira, Av. 24 de Julho 50, 1200-479 Lisboa",
        lat: 38.7069,
        lng: -9.1458,
        rating: 4.8,
        description: "A thousand plants above the market hall.",
        services: &["wifi", "coffee", "meeting-rooms", "event-space", "24-7-access"],
    },
    SeedSpace {
        id: 4,
        name: "Cowork Central",
        city: "Lisbon",
        address: "Rua da Prata 80, 1100-415 Lisboa",
        lat: 38.7105,
        lng: -9.1370,
        rating: 3.7,
        description: "Small and friendly desk rental in Baixa.",
        services: &["wifi", "kitchen"],
    },
    SeedSpace {
        id: 5,
        name: "Betahaus Barcelona",
        city: "Barcelona",
        address: "Carrer de Vilafranca 7, 08024 Barcelona",
        lat: 41.4036,
        lng: 2.1557,
        rating: 4.4,
        description: "Workshop, rooftop terrace and a busy café in Gràcia.",
        services: &["wifi", "coffee", "meeting-rooms", "parking", "event-space"],
    },
    SeedSpace {
        id: 6,
        name: "Spaces Vijzelstraat",
        city: "Amsterdam",
        address: "Vijzelstraat 68, 1017 HL Amsterdam",
        lat: 52.3631,
        lng: 4.8913,
        rating: 4.1,
        description: "Former bank building on the canal ring.",
        services: &["wifi", "coffee", "meeting-rooms", "phone-booths", "24-7-access", "printing"],
    },
    SeedSpace {
        id: 7,
        name: "The Office Group Shoreditch",
        city: "London",
        address: "1 Rivington Place, London EC2A 3BA",
        lat: 51.5265,
        lng: -0.0800,
        rating: 4.9,
        description: "Design-led private offices and hot desks.",
        services: &["wifi", "coffee", "meeting-rooms", "phone-booths", "lockers", "24-7-access"],
    },
    SeedSpace {
        id: 8,
        name: "Desk Nomad Pop-up",
        city: "Porto",
        address: "Rua das Flores 120, 4050-265 Porto",
        lat: 41.1436,
        lng: -8.6131,
        rating: 3.2,
        description: "Seasonal pop-up, pricing on request.",
        services: &["wifi"],
    },
];

/// Spaces without pricing; packages live in [`pricing_packages`]
pub fn spaces() -> Vec<Space> {
    SEED_SPACES
        .iter()
        .map(|seed| Space {
            id: SpaceId(seed.id),
            name: seed.name.to_string(),
            city: seed.city.to_string(),
            address: seed.address.to_string(),
            lat: seed.lat,
            lng: seed.lng,
            rating: seed.rating,
            image_url: Some(format!("https://images.cowork.example/spaces/{}.jpg", seed.id)),
            description: Some(seed.description.to_string()),
            service_ids: seed.services.iter().map(|s| s.to_string()).collect(),
            pricing_packages: Vec::new(),
        })
        .collect()
}

/// Pricing packages of every seeded space except the pop-up
pub fn pricing_packages() -> Vec<PricingPackage> {
    let rows: &[(i64, &str, f64, BillingPeriod, &[&str])] = &[
        (1, "Day Pass", 25.0, BillingPeriod::Day, &["Hot desk", "Coffee"]),
        (1, "Flex Desk", 220.0, BillingPeriod::Month, &["Hot desk", "Locker", "Events"]),
        (1, "Fixed Desk", 350.0, BillingPeriod::Month, &["Own desk", "Locker", "Mail handling"]),
        (2, "Day Pass", 18.0, BillingPeriod::Day, &["Hot desk"]),
        (2, "Ten Days", 150.0, BillingPeriod::Month, &["Ten day passes", "Printing credit"]),
        (3, "Day Pass", 30.0, BillingPeriod::Day, &["Hot desk", "Coffee", "Events"]),
        (3, "Resident", 400.0, BillingPeriod::Month, &["24/7 access", "Meeting credits"]),
        (4, "Day Pass", 12.0, BillingPeriod::Day, &["Hot desk"]),
        (4, "Monthly", 140.0, BillingPeriod::Month, &["Hot desk", "Kitchen"]),
        (5, "Hourly", 6.0, BillingPeriod::Hour, &["Hot desk"]),
        (5, "Flex", 190.0, BillingPeriod::Month, &["Hot desk", "Parking discount"]),
        (6, "Day Pass", 35.0, BillingPeriod::Day, &["Hot desk", "Coffee"]),
        (6, "Business Lounge", 2100.0, BillingPeriod::Year, &["Lounge access", "Global network"]),
        (7, "Hot Desk", 45.0, BillingPeriod::Day, &["Hot desk", "Phone booths"]),
        (7, "Private Office", 1200.0, BillingPeriod::Month, &["Lockable office", "24/7 access"]),
        (7, "Team Week", 600.0, BillingPeriod::Week, &["Four desks", "Meeting room"]),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (space_id, name, price, period, features))| PricingPackage {
            id: i as i64 + 1,
            space_id: SpaceId(*space_id),
            name: name.to_string(),
            price: *price,
            billing_period: *period,
            features: features.iter().map(|f| f.to_string()).collect(),
        })
        .collect()
}

/// Blog posts
pub fn posts() -> Vec<BlogPost> {
    vec![
        BlogPost {
            slug: "choosing-your-first-coworking-space".to_string(),
            title: "Choosing your first coworking space".to_string(),
            excerpt: "Five questions to ask before signing up for a membership.".to_string(),
            content: "Start with the commute, then the noise level, then the community. \
                      Visit on a weekday, try the coffee and book a day pass before committing."
                .to_string(),
            author: "Directory Team".to_string(),
            published_at: published(2024, 3, 4),
            tags: vec!["guides".to_string()],
            cover_image_url: Some("https://images.cowork.example/blog/first-space.jpg".to_string()),
        },
        BlogPost {
            slug: "day-pass-vs-monthly".to_string(),
            title: "Day pass or monthly membership?".to_string(),
            excerpt: "When a flexible plan pays for itself.".to_string(),
            content: "If you work from a space more than eight days a month, a flex membership \
                      is usually cheaper than day passes."
                .to_string(),
            author: "Directory Team".to_string(),
            published_at: published(2024, 6, 17),
            tags: vec!["pricing".to_string(), "guides".to_string()],
            cover_image_url: None,
        },
        BlogPost {
            slug: "working-remotely-from-lisbon".to_string(),
            title: "Working remotely from Lisbon".to_string(),
            excerpt: "Neighbourhoods, spaces and the best time of year to go.".to_string(),
            content: "Baixa and Cais do Sodré are walkable and well connected; \
                      expect busier spaces between April and October."
                .to_string(),
            author: "Guest Writer".to_string(),
            published_at: published(2024, 9, 2),
            tags: vec!["cities".to_string()],
            cover_image_url: Some("https://images.cowork.example/blog/lisbon.jpg".to_string()),
        },
    ]
}

fn published(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).single().unwrap_or_default()
}
