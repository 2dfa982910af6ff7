//! Compiled-in sample data used whenever nothing has been persisted yet.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{PaymentMethod, Sale, User, UserRole, UserStatus};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The ten starting sales in their display order.
pub fn seed_sales() -> Vec<Sale> {
    use PaymentMethod::*;
    [
        ("V001", at(2025, 5, 9, 8, 30), "Juan Pérez", 125_000, Cash),
        ("V002", at(2025, 5, 9, 9, 15), "María González", 78_500, Debit),
        ("V003", at(2025, 5, 9, 10, 5), "Carlos Rodríguez", 245_000, Credit),
        ("V004", at(2025, 5, 8, 14, 20), "Ana Martínez", 56_000, Cash),
        ("V005", at(2025, 5, 8, 16, 45), "Pedro Sánchez", 189_000, Debit),
        ("V006", at(2025, 5, 8, 17, 30), "Laura Torres", 320_000, Credit),
        ("V007", at(2025, 5, 7, 9, 10), "Juan Pérez", 95_000, Cash),
        ("V008", at(2025, 5, 7, 11, 25), "María González", 145_000, Debit),
        ("V009", at(2025, 5, 7, 15, 40), "Carlos Rodríguez", 275_000, Credit),
        ("V010", at(2025, 5, 6, 10, 15), "Ana Martínez", 68_000, Cash),
    ]
    .into_iter()
    .map(|(id, timestamp, seller, amount, method)| Sale::new(id, timestamp, seller, amount, method))
    .collect()
}

pub fn seed_users() -> Vec<User> {
    use UserRole::*;
    use UserStatus::*;
    [
        ("U001", "Juan Pérez", "juan.perez", Admin, Active, day(2024, 1, 15)),
        ("U002", "María González", "maria.gonzalez", Seller, Active, day(2024, 2, 20)),
        ("U003", "Carlos Rodríguez", "carlos.rodriguez", Seller, Active, day(2024, 3, 10)),
        ("U004", "Ana Martínez", "ana.martinez", Supervisor, Active, day(2024, 3, 15)),
        ("U005", "Pedro Sánchez", "pedro.sanchez", Seller, Inactive, day(2024, 4, 5)),
        ("U006", "Laura Torres", "laura.torres", Accountant, Active, day(2024, 4, 20)),
        ("U007", "Roberto Díaz", "roberto.diaz", Seller, Suspended, day(2024, 5, 1)),
        ("U008", "Sofía López", "sofia.lopez", Supervisor, Active, day(2024, 5, 5)),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (id, name, mailbox, role, status, registration_date))| User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{mailbox}@ejemplo.com"),
        role,
        status,
        registration_date,
        avatar: Some(format!("/avatars/{:02}.png", index + 1)),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_sales_are_valid_and_unique() {
        let sales = seed_sales();
        assert_eq!(sales.len(), 10);
        assert!(sales.iter().all(Sale::is_valid));
        assert!(sales.iter().all(|s| s.timestamp != DateTime::<Utc>::default()));
        let ids: HashSet<_> = sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), sales.len());
        assert_eq!(sales[0].id, "V001");
        assert_eq!(sales[0].amount, 125_000);
    }

    #[test]
    fn seed_users_cover_every_role() {
        let users = seed_users();
        assert_eq!(users.len(), 8);
        for role in [UserRole::Admin, UserRole::Seller, UserRole::Supervisor, UserRole::Accountant] {
            assert!(users.iter().any(|u| u.role == role), "missing {role}");
        }
        assert_eq!(users[6].status, UserStatus::Suspended);
        assert_eq!(users[7].avatar.as_deref(), Some("/avatars/08.png"));
        assert_eq!(users[0].email, "juan.perez@ejemplo.com");
    }
}
