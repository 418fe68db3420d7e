//! Membership plans and extra services
//!
//! The price list is fixed and served as-is.

use serde::Serialize;

/// Monthly membership plan
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricingPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Roubles per month
    pub price: u32,
    pub popular: bool,
    pub features: &'static [&'static str],
}

/// Service sold on top of a membership
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExtraService {
    pub name: &'static str,
    /// Roubles
    pub price: u32,
    /// `true` when `price` is a starting price
    pub from: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceList {
    pub plans: &'static [PricingPlan],
    pub extras: &'static [ExtraService],
}

pub static PLANS: [PricingPlan; 3] = [
    PricingPlan {
        id: "basic",
        name: "Базовый",
        price: 2990,
        popular: false,
        features: &[
            "Доступ в тренажерный зал",
            "Раздевалки и душевые",
            "Консультация тренера",
            "Групповые занятия (5 в месяц)",
        ],
    },
    PricingPlan {
        id: "standard",
        name: "Стандарт",
        price: 4990,
        popular: true,
        features: &[
            "Все из тарифа Базовый",
            "Безлимитные групповые занятия",
            "Доступ к бассейну",
            "Сауна и хамам",
            "Персональная программа тренировок",
            "Заморозка абонемента (7 дней)",
        ],
    },
    PricingPlan {
        id: "premium",
        name: "Премиум",
        price: 7990,
        popular: false,
        features: &[
            "Все из тарифа Стандарт",
            "2 персональные тренировки",
            "Консультация диетолога",
            "Массаж (1 сеанс)",
            "Приоритетная запись",
            "Гостевые визиты (2 в месяц)",
            "Заморозка абонемента (14 дней)",
        ],
    },
];

pub static EXTRAS: [ExtraService; 4] = [
    ExtraService {
        name: "Персональная тренировка",
        price: 2000,
        from: true,
    },
    ExtraService {
        name: "Массаж",
        price: 1500,
        from: true,
    },
    ExtraService {
        name: "Консультация диетолога",
        price: 2500,
        from: false,
    },
    ExtraService {
        name: "Разовое посещение",
        price: 800,
        from: false,
    },
];

pub fn price_list() -> PriceList {
    PriceList {
        plans: &PLANS,
        extras: &EXTRAS,
    }
}
