//! Objects seeded by the acceptance database dump.
//!
//! Ids, names and attribute values here must match the dump the service is
//! started with. Builders return fresh vectors so tests can adjust them.

use chrono::NaiveDate;
use datacollect_core::{CalendarDto, CalendarLevel, DimensionElementDto, MeasureElementDto};

pub const REGIONS_DIMENSION_ID: i64 = 12;
pub const PRODUCTS_DIMENSION_ID: i64 = 14;
pub const SALES_MEASURE_GROUP_ID: i64 = 3;
pub const CALENDAR_ID: i64 = 1;

/// No object has this id.
pub const MISSING_ID: i64 = 999_999;

/// Attribute names of the regions dimension.
pub mod attr {
    pub const CODE: &str = "Код";
    pub const POPULATION: &str = "Население";
    pub const AREA: &str = "Площадь";
    pub const CAPITAL: &str = "Столица";
    pub const FOUNDED: &str = "Дата образования";
    pub const PRICE: &str = "Цена";
    pub const UNIT: &str = "Единица";
}

/// Fragments of error messages the service reports.
pub mod messages {
    pub const UNIQUE: &str = "должно быть уникальным";
    pub const REQUIRED: &str = "обязательно";
    pub const ACCESS_DENIED: &str = "Нет прав";
    pub const NOT_FOUND: &str = "не найден";
    pub const INVALID_TYPE: &str = "неверный формат";
}

pub const RUSSIA: &str = "Россия";
pub const CENTRAL: &str = "Центральный федеральный округ";
pub const VOLGA: &str = "Приволжский федеральный округ";

pub mod region_ids {
    pub const RUSSIA: i64 = 100;
    pub const CENTRAL: i64 = 110;
    pub const MOSCOW: i64 = 111;
    pub const MOSCOW_OBLAST: i64 = 112;
    pub const VOLGA: i64 = 120;
    pub const TATARSTAN: i64 = 121;
    pub const NIZHNY_NOVGOROD: i64 = 122;
}

pub mod product_ids {
    pub const MILK: i64 = 201;
    pub const BREAD: i64 = 202;
    pub const CHEESE: i64 = 203;
}

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid date literal"),
    }
}

/// The regions hierarchy in depth-first order.
pub fn regions() -> Vec<DimensionElementDto> {
    use attr::*;
    use region_ids as id;

    vec![
        DimensionElementDto::folder(id::RUSSIA, RUSSIA),
        DimensionElementDto::folder(id::CENTRAL, CENTRAL)
            .with_parent(id::RUSSIA)
            .with_path([RUSSIA]),
        DimensionElementDto::new(id::MOSCOW, "Москва")
            .with_parent(id::CENTRAL)
            .with_path([RUSSIA, CENTRAL])
            .with_attribute(CODE, "77")
            .with_attribute(POPULATION, 13_010_112)
            .with_attribute(AREA, 2561.5)
            .with_attribute(CAPITAL, true)
            .with_attribute(FOUNDED, date(1147, 4, 4)),
        DimensionElementDto::new(id::MOSCOW_OBLAST, "Московская область")
            .with_parent(id::CENTRAL)
            .with_path([RUSSIA, CENTRAL])
            .with_attribute(CODE, "50")
            .with_attribute(POPULATION, 8_524_665)
            .with_attribute(AREA, 44329.0)
            .with_attribute(CAPITAL, false)
            .with_attribute(FOUNDED, date(1929, 1, 14)),
        DimensionElementDto::folder(id::VOLGA, VOLGA)
            .with_parent(id::RUSSIA)
            .with_path([RUSSIA]),
        DimensionElementDto::new(id::TATARSTAN, "Республика Татарстан")
            .with_parent(id::VOLGA)
            .with_path([RUSSIA, VOLGA])
            .with_attribute(CODE, "16")
            .with_attribute(POPULATION, 4_004_809)
            .with_attribute(AREA, 67847.0)
            .with_attribute(CAPITAL, false)
            .with_attribute(FOUNDED, date(1920, 5, 27)),
        DimensionElementDto::new(id::NIZHNY_NOVGOROD, "Нижегородская область")
            .with_parent(id::VOLGA)
            .with_path([RUSSIA, VOLGA])
            .with_attribute(CODE, "52")
            .with_attribute(POPULATION, 3_119_115)
            .with_attribute(AREA, 76624.0)
            .with_attribute(CAPITAL, false)
            .with_attribute(FOUNDED, date(1936, 12, 5)),
    ]
}

/// A single seeded region by id.
pub fn region(id: i64) -> Option<DimensionElementDto> {
    regions().into_iter().find(|e| e.id == id)
}

/// Regions that are not folders.
pub fn region_leaves() -> Vec<DimensionElementDto> {
    regions().into_iter().filter(|e| !e.is_folder).collect()
}

/// The flat products dimension.
pub fn products() -> Vec<DimensionElementDto> {
    use attr::{CODE, PRICE, UNIT};
    use product_ids as id;

    vec![
        DimensionElementDto::new(id::MILK, "Молоко")
            .with_attribute(CODE, "P-001")
            .with_attribute(PRICE, 89.9)
            .with_attribute(UNIT, "л"),
        DimensionElementDto::new(id::BREAD, "Хлеб")
            .with_attribute(CODE, "P-002")
            .with_attribute(PRICE, 45)
            .with_attribute(UNIT, "шт"),
        DimensionElementDto::new(id::CHEESE, "Сыр")
            .with_attribute(CODE, "P-003")
            .with_attribute(PRICE, 799.5)
            .with_attribute(UNIT, "кг"),
    ]
}

/// Dimension names used as coordinates of the sales measure group.
pub mod sales {
    pub const REGION: &str = "Регионы";
    pub const PRODUCT: &str = "Товары";
    pub const YEAR: &str = "Календарь";
    pub const REVENUE: &str = "Выручка";
    pub const QUANTITY: &str = "Количество";
}

/// Sales rows for calendar year 2021.
pub fn sales_2021() -> Vec<MeasureElementDto> {
    use product_ids as product;
    use region_ids as region;

    let row = |id: i64, region_id: i64, product_id: i64, revenue: f64, quantity: i64| {
        MeasureElementDto::new(id)
            .with_coordinate(sales::REGION, region_id)
            .with_coordinate(sales::PRODUCT, product_id)
            .with_coordinate(sales::YEAR, 2021)
            .with_value(sales::REVENUE, revenue)
            .with_value(sales::QUANTITY, quantity)
    };

    vec![
        row(3001, region::MOSCOW, product::MILK, 1_798_000.0, 20_000),
        row(3002, region::MOSCOW, product::BREAD, 900_000.0, 20_000),
        row(3003, region::TATARSTAN, product::MILK, 449_500.0, 5_000),
        row(3004, region::NIZHNY_NOVGOROD, product::CHEESE, 399_750.0, 500),
    ]
}

/// Years of the seeded calendar.
pub fn calendar_years() -> Vec<CalendarDto> {
    vec![
        CalendarDto::new(2021, "2021", CalendarLevel::Year, date(2021, 1, 1), date(2021, 12, 31)),
        CalendarDto::new(2022, "2022", CalendarLevel::Year, date(2022, 1, 1), date(2022, 12, 31)),
    ]
}

/// Quarters of 2021.
pub fn calendar_quarters_2021() -> Vec<CalendarDto> {
    let quarter = |n: i64, start: NaiveDate, end: NaiveDate| {
        CalendarDto::new(
            20210 + n,
            format!("{} квартал 2021", n),
            CalendarLevel::Quarter,
            start,
            end,
        )
    };

    vec![
        quarter(1, date(2021, 1, 1), date(2021, 3, 31)),
        quarter(2, date(2021, 4, 1), date(2021, 6, 30)),
        quarter(3, date(2021, 7, 1), date(2021, 9, 30)),
        quarter(4, date(2021, 10, 1), date(2021, 12, 31)),
    ]
}
