use poimap_core::{Point, PointSet, field};

/// Name of the bundled sample dataset.
pub const BUILTIN_NAME: &str = "Monasteries";

struct Entry {
    id: u64,
    name: &'static str,
    town: &'static str,
    description: &'static str,
    visiting: &'static str,
    link: &'static str,
    image: &'static str,
    lat: f64,
    lon: f64,
}

const MONASTERIES: [Entry; 6] = [
    Entry {
        id: 1,
        name: "Rumtek Monastery",
        town: "Gangtok",
        description: "Seat-in-exile of the Karmapa, near Gangtok.",
        visiting: "Open: 9 AM - 6 PM",
        link: "https://rumtek.org/",
        image: "/beautiful-himalayan-monastery-with-golden-roofs-an.jpg",
        lat: 27.3258,
        lon: 88.6012,
    },
    Entry {
        id: 2,
        name: "Pemayangtse Monastery",
        town: "Pelling",
        description: "Historic Nyingma monastery near Pelling.",
        visiting: "Open: 9 AM - 5 PM",
        link: "https://www.sikkimstdc.com/",
        image: "/ancient-tibetan-monastery-interior-with-wooden-scu.jpg",
        lat: 27.304_53,
        lon: 88.252_04,
    },
    Entry {
        id: 3,
        name: "Tashiding Monastery",
        town: "Tashiding",
        description: "Pilgrimage site known for Bumchu's sacred water ritual.",
        visiting: "Open: 8 AM - 5 PM",
        link: "https://www.sikkimtourism.gov.in/",
        image: "https://upload.wikimedia.org/wikipedia/commons/f/f7/Tashiding_Monastery_Sikkim.jpg",
        lat: 27.274,
        lon: 88.287,
    },
    Entry {
        id: 4,
        name: "Enchey Monastery",
        town: "Gangtok",
        description: "A 200-year-old monastery with rich murals and ceremonies.",
        visiting: "Open: 9 AM - 6 PM",
        link: "https://www.sikkimtourism.gov.in/",
        image: "https://upload.wikimedia.org/wikipedia/commons/2/29/Enchey_Monastery_Gangtok.jpg",
        lat: 27.3381,
        lon: 88.6132,
    },
    Entry {
        id: 5,
        name: "Ralang Monastery",
        town: "Ralang",
        description: "Known for its stunning architecture and prayer halls.",
        visiting: "Open: 8 AM - 5 PM",
        link: "https://www.sikkimtourism.gov.in/",
        image: "https://upload.wikimedia.org/wikipedia/commons/7/7f/Ralang_Monastery.jpg",
        lat: 27.1675,
        lon: 88.6622,
    },
    Entry {
        id: 6,
        name: "Phodong Monastery",
        town: "Phodong",
        description: "Seat of the Nyingma sect with rich cultural heritage.",
        visiting: "Open: 9 AM - 5 PM",
        link: "https://www.sikkimtourism.gov.in/",
        image: "https://upload.wikimedia.org/wikipedia/commons/a/ab/Phodong_Monastery_Sikkim.jpg",
        lat: 27.428,
        lon: 88.613,
    },
];

/// Six monasteries across Sikkim, used when no dataset file is given.
pub fn monasteries() -> PointSet {
    let points = MONASTERIES.iter().map(|entry| {
        Point::from_lat_lon(entry.id, entry.name, entry.lat, entry.lon)
            .with_field(field::TOWN, entry.town)
            .with_field(field::DESCRIPTION, entry.description)
            .with_field(field::VISITING, entry.visiting)
            .with_field(field::LINK, entry.link)
            .with_field(field::IMAGE, entry.image)
    });
    PointSet::new(BUILTIN_NAME, points)
}
