//! # Seed Inventory
//!
//! The room-type catalogue and room list installed when the store
//! initializes an empty medium. Reference data only; bookings, guests,
//! folios and payments always start empty.

use haveli_core::{Money, Room, RoomStatus, RoomType};

/// The four sellable room types.
pub fn room_types() -> Vec<RoomType> {
    vec![
        RoomType {
            id: "rt-1".into(),
            name: "Standard Room".into(),
            description: "Comfortable room with essential amenities, perfect for solo \
                          travelers or couples. Features AC, TV, and attached bathroom."
                .into(),
            base_price: Money::from_rupees(1200),
            capacity: 2,
            amenities: vec![
                "AC".into(),
                "TV".into(),
                "Wi-Fi".into(),
                "Attached Bathroom".into(),
                "Room Service".into(),
                "Daily Housekeeping".into(),
            ],
            images: vec!["rooms/standard-1.jpg".into(), "rooms/standard-2.jpg".into()],
        },
        RoomType {
            id: "rt-2".into(),
            name: "Deluxe Room".into(),
            description: "Spacious room with premium furnishings and additional amenities. \
                          Ideal for families or guests seeking extra comfort."
                .into(),
            base_price: Money::from_rupees(1800),
            capacity: 3,
            amenities: vec![
                "AC".into(),
                "Smart TV".into(),
                "Wi-Fi".into(),
                "Attached Bathroom".into(),
                "Mini Fridge".into(),
                "Room Service".into(),
                "Daily Housekeeping".into(),
                "Wardrobe".into(),
            ],
            images: vec![
                "rooms/deluxe-1.jpg".into(),
                "rooms/deluxe-2.jpg".into(),
                "rooms/deluxe-3.jpg".into(),
            ],
        },
        RoomType {
            id: "rt-3".into(),
            name: "Family Suite".into(),
            description: "Large suite with separate living area, perfect for families. \
                          Includes extra beds and family-friendly amenities."
                .into(),
            base_price: Money::from_rupees(2500),
            capacity: 4,
            amenities: vec![
                "AC".into(),
                "Smart TV".into(),
                "Wi-Fi".into(),
                "Attached Bathroom".into(),
                "Mini Fridge".into(),
                "Room Service".into(),
                "Daily Housekeeping".into(),
                "Wardrobe".into(),
                "Sofa Set".into(),
                "Extra Beds".into(),
            ],
            images: vec!["rooms/suite-1.jpg".into(), "rooms/suite-2.jpg".into()],
        },
        RoomType {
            id: "rt-4".into(),
            name: "Premium Suite".into(),
            description: "Our finest accommodation with luxury amenities, panoramic views, \
                          and personalized service for an unforgettable stay."
                .into(),
            base_price: Money::from_rupees(3500),
            capacity: 2,
            amenities: vec![
                "AC".into(),
                "Smart TV".into(),
                "Wi-Fi".into(),
                "Attached Bathroom".into(),
                "Mini Fridge".into(),
                "Room Service".into(),
                "Daily Housekeeping".into(),
                "Wardrobe".into(),
                "Sofa Set".into(),
                "Work Desk".into(),
                "Premium Toiletries".into(),
                "Complimentary Breakfast".into(),
            ],
            images: vec!["rooms/premium-1.jpg".into(), "rooms/premium-2.jpg".into()],
        },
    ]
}

/// The physical rooms, all starting AVAILABLE.
pub fn rooms() -> Vec<Room> {
    let plan: &[(&str, &str)] = &[
        // Standard rooms
        ("101", "rt-1"),
        ("102", "rt-1"),
        ("103", "rt-1"),
        ("104", "rt-1"),
        // Deluxe rooms
        ("201", "rt-2"),
        ("202", "rt-2"),
        ("203", "rt-2"),
        // Family suites
        ("301", "rt-3"),
        ("302", "rt-3"),
        // Premium suites
        ("401", "rt-4"),
        ("402", "rt-4"),
    ];

    plan.iter()
        .map(|(number, type_id)| Room {
            id: format!("r-{number}"),
            number: (*number).into(),
            type_id: (*type_id).into(),
            status: RoomStatus::Available,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_room_references_a_seeded_type() {
        let type_ids: HashSet<String> = room_types().into_iter().map(|rt| rt.id).collect();
        for room in rooms() {
            assert!(type_ids.contains(&room.type_id), "room {} has unknown type", room.number);
        }
    }

    #[test]
    fn test_room_numbers_are_unique() {
        let all = rooms();
        let numbers: HashSet<&str> = all.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers.len(), all.len());
    }

    #[test]
    fn test_capacities_and_prices_are_positive() {
        for rt in room_types() {
            assert!(rt.capacity > 0);
            assert!(rt.base_price.is_positive());
        }
    }
}
