// Live tests for dimension elements: search, create and update.
// These need a deployed service loaded with the acceptance dump, so they are
// marked with #[ignore]. Run with `cargo test -- --ignored`.

use anyhow::Result;
use datacollect_acceptance::data::{self, attr, messages, region_ids};
use datacollect_acceptance::scenario::routes;
use datacollect_acceptance::{PathParams, Role, SuiteFixture, UrlTemplate};
use datacollect_core::{
    AttributeType, CreateElementDto, DimensionElementDto, DimensionElementsVerifier, NamedFilter,
    SearchRequest, SimpleField, SimpleFilter, UpdateElementDto, VerifyOptions,
};
use datacollect_sdk::{Method, StatusCode};
use pretty_assertions::assert_eq;

const REGIONS: i64 = data::REGIONS_DIMENSION_ID;

fn regions_with(ids: &[i64]) -> Vec<DimensionElementDto> {
    data::regions()
        .into_iter()
        .filter(|e| ids.contains(&e.id))
        .collect()
}

async fn search_regions(role: Role, request: &SearchRequest) -> Result<Vec<DimensionElementDto>> {
    let suite = SuiteFixture::global().await?;
    let client = suite.scenario()?.client_as(role).await?;
    Ok(client.dimensions().search_elements(REGIONS, request).await?)
}

// ===== Metadata =====

#[tokio::test]
#[ignore]
async fn test_regions_dimension_metadata() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let client = suite.scenario()?.client_as(Role::Admin).await?;

    let dimension = client.dimensions().get(REGIONS).await?;

    assert_eq!(dimension.name, "Регионы");
    let code = dimension.attribute(attr::CODE).expect("Код attribute");
    assert!(code.is_required);
    assert!(code.is_unique);
    assert_eq!(
        dimension.attribute(attr::POPULATION).map(|a| a.attribute_type),
        Some(AttributeType::Integer)
    );
    assert_eq!(
        dimension.attribute(attr::FOUNDED).map(|a| a.attribute_type),
        Some(AttributeType::Date)
    );
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_missing_dimension_is_not_found() -> Result<()> {
    let suite = SuiteFixture::global().await?;

    suite
        .scenario()?
        .expect_error(
            Role::Admin,
            Method::GET,
            &UrlTemplate::new(routes::DIMENSION),
            &PathParams::new().set("dimensionId", data::MISSING_ID),
            None::<()>,
            StatusCode::NOT_FOUND,
            messages::NOT_FOUND,
        )
        .await?;
    Ok(())
}

// ===== Search =====

#[tokio::test]
#[ignore]
async fn test_search_without_filters_returns_whole_hierarchy() -> Result<()> {
    let actual = search_regions(Role::Viewer, &SearchRequest::new()).await?;

    DimensionElementsVerifier::new(VerifyOptions::new())
        .verify(&actual, &data::regions())
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_by_code() -> Result<()> {
    let request = SearchRequest::new().filter(SimpleFilter::equal(attr::CODE, "77"));

    let actual = search_regions(Role::Viewer, &request).await?;

    DimensionElementsVerifier::default()
        .verify(&actual, &regions_with(&[region_ids::MOSCOW]))
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_by_name_prefix() -> Result<()> {
    let request = SearchRequest::new().filter(SimpleFilter::starts_with("name", "Моск"));

    let actual = search_regions(Role::Viewer, &request).await?;

    DimensionElementsVerifier::default()
        .verify(
            &actual,
            &regions_with(&[region_ids::MOSCOW, region_ids::MOSCOW_OBLAST]),
        )
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_by_population_range() -> Result<()> {
    let request = SearchRequest::new()
        .filter(SimpleFilter::greater(attr::POPULATION, 4_000_000))
        .filter(SimpleFilter::less_or_equal(attr::POPULATION, 10_000_000));

    let actual = search_regions(Role::Viewer, &request).await?;

    DimensionElementsVerifier::default()
        .verify(
            &actual,
            &regions_with(&[region_ids::MOSCOW_OBLAST, region_ids::TATARSTAN]),
        )
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_by_date_attribute() -> Result<()> {
    let request =
        SearchRequest::new().filter(SimpleFilter::less(attr::FOUNDED, "1925-01-01"));

    let actual = search_regions(Role::Viewer, &request).await?;

    DimensionElementsVerifier::default()
        .verify(
            &actual,
            &regions_with(&[region_ids::MOSCOW, region_ids::TATARSTAN]),
        )
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_folders_have_no_code() -> Result<()> {
    let request = SearchRequest::new().filter(SimpleFilter::is_null(attr::CODE));

    let actual = search_regions(Role::Viewer, &request).await?;

    let folders: Vec<_> = data::regions().into_iter().filter(|e| e.is_folder).collect();
    DimensionElementsVerifier::default()
        .verify(&actual, &folders)
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_one_of_codes() -> Result<()> {
    let request = SearchRequest::new().filter(SimpleFilter::one_of(attr::CODE, ["16", "52"]));

    let actual = search_regions(Role::Viewer, &request).await?;

    DimensionElementsVerifier::default()
        .verify(
            &actual,
            &regions_with(&[region_ids::TATARSTAN, region_ids::NIZHNY_NOVGOROD]),
        )
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_children_of_folder() -> Result<()> {
    let request = SearchRequest::new()
        .filter(NamedFilter::new("ChildrenOf").with_parameter("folderId", region_ids::VOLGA));

    let actual = search_regions(Role::Viewer, &request).await?;

    DimensionElementsVerifier::default()
        .verify(
            &actual,
            &regions_with(&[region_ids::TATARSTAN, region_ids::NIZHNY_NOVGOROD]),
        )
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_paged_in_name_order() -> Result<()> {
    let request = SearchRequest::new()
        .filter(SimpleFilter::is_not_null(attr::CODE))
        .order_by("name")
        .skip(1)
        .take(2);

    let actual = search_regions(Role::Viewer, &request).await?;

    // Москва, Московская область, Нижегородская область, Республика Татарстан
    DimensionElementsVerifier::new(VerifyOptions::new().ordered())
        .verify(
            &actual,
            &regions_with(&[region_ids::MOSCOW_OBLAST, region_ids::NIZHNY_NOVGOROD]),
        )
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_selected_fields_only() -> Result<()> {
    let request = SearchRequest::new()
        .filter(SimpleFilter::equal(attr::CODE, "50"))
        .field(SimpleField::new(attr::CODE));

    let actual = search_regions(Role::Viewer, &request).await?;

    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].name, "Московская область");
    assert_eq!(
        actual[0].attributes.keys().collect::<Vec<_>>(),
        vec![attr::CODE]
    );
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_unknown_attribute_is_rejected() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let request = SearchRequest::new().filter(SimpleFilter::equal("Несуществующий", "1"));

    suite
        .scenario()?
        .expect_error(
            Role::Viewer,
            Method::POST,
            &UrlTemplate::new(routes::DIMENSION_ELEMENTS_SEARCH),
            &PathParams::new().set("dimensionId", REGIONS),
            Some(&request),
            StatusCode::BAD_REQUEST,
            "Несуществующий",
        )
        .await?;
    Ok(())
}

// ===== Update =====

#[tokio::test]
#[ignore]
async fn test_update_attributes_and_restore() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let updated = data::region(region_ids::TATARSTAN)
        .expect("seeded region")
        .with_attribute(attr::POPULATION, 4_100_000)
        .with_attribute(attr::AREA, 67_847.5);

    let verification = suite
        .put_scenario()?
        .update_verify_restore(
            Role::Editor,
            REGIONS,
            &[UpdateElementDto::new(region_ids::TATARSTAN)
                .with_attribute(attr::POPULATION, 4_100_000)
                .with_attribute(attr::AREA, 67_847.5)],
            &SearchRequest::new().filter(SimpleFilter::equal(attr::CODE, "16")),
            &[updated],
            VerifyOptions::new(),
        )
        .await?;

    verification.assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_move_element_to_other_folder_and_restore() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let moved = data::region(region_ids::NIZHNY_NOVGOROD)
        .expect("seeded region")
        .with_parent(region_ids::CENTRAL)
        .with_path([data::RUSSIA, data::CENTRAL]);

    let verification = suite
        .put_scenario()?
        .update_verify_restore(
            Role::Admin,
            REGIONS,
            &[UpdateElementDto::new(region_ids::NIZHNY_NOVGOROD)
                .move_to([data::RUSSIA, data::CENTRAL])],
            &SearchRequest::new().filter(SimpleFilter::equal(attr::CODE, "52")),
            &[moved],
            VerifyOptions::new(),
        )
        .await?;

    verification.assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_update_duplicate_code_is_rejected() -> Result<()> {
    let suite = SuiteFixture::global().await?;

    let result = suite
        .put_scenario()?
        .update_expecting_error(
            Role::Admin,
            REGIONS,
            &[UpdateElementDto::new(region_ids::MOSCOW).with_attribute(attr::CODE, "50")],
            messages::UNIQUE,
        )
        .await?;

    assert_eq!(result.updated_count, 0);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_update_date_with_text_is_rejected() -> Result<()> {
    let suite = SuiteFixture::global().await?;

    suite
        .put_scenario()?
        .update_expecting_error(
            Role::Admin,
            REGIONS,
            &[UpdateElementDto::new(region_ids::MOSCOW).with_attribute(attr::FOUNDED, "давно")],
            messages::INVALID_TYPE,
        )
        .await?;
    Ok(())
}

// ===== Create =====

#[tokio::test]
#[ignore]
async fn test_create_element_in_existing_folder() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let created = CreateElementDto::new("Пермский край")
        .in_folder([data::RUSSIA, data::VOLGA])
        .with_attribute(attr::CODE, "59")
        .with_attribute(attr::POPULATION, 2_532_405)
        .with_attribute(attr::CAPITAL, false);
    let expected = DimensionElementDto::new(0, "Пермский край")
        .with_parent(region_ids::VOLGA)
        .with_path([data::RUSSIA, data::VOLGA])
        .with_attribute(attr::CODE, "59")
        .with_attribute(attr::POPULATION, 2_532_405)
        .with_attribute(attr::CAPITAL, false);

    suite
        .create_scenario()?
        .create_verify_cleanup(Role::Editor, REGIONS, &[created], &[expected])
        .await?
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_create_element_in_new_folder_creates_hierarchy() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let district = "Тестовый федеральный округ";
    let created = CreateElementDto::new("Тестовая область")
        .in_folder([data::RUSSIA, district])
        .with_attribute(attr::CODE, "990");
    let expected = [
        DimensionElementDto::folder(0, district).with_path([data::RUSSIA]),
        DimensionElementDto::new(0, "Тестовая область")
            .with_path([data::RUSSIA, district])
            .with_attribute(attr::CODE, "990"),
    ];

    suite
        .create_scenario()?
        .create_verify_cleanup(Role::Admin, REGIONS, &[created], &expected)
        .await?
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_create_elements_sharing_new_folder_merges_it() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let district = "Тестовый федеральный округ";
    let territory = "Тестовый край";
    let path = [data::RUSSIA, district, territory];
    let created = [
        CreateElementDto::new("Тестовая область 1")
            .in_folder(path)
            .with_attribute(attr::CODE, "991"),
        CreateElementDto::new("Тестовая область 2")
            .in_folder(path)
            .with_attribute(attr::CODE, "992"),
    ];
    // One folder per level, however many elements name it
    let expected = [
        DimensionElementDto::folder(0, district).with_path([data::RUSSIA]),
        DimensionElementDto::folder(0, territory).with_path([data::RUSSIA, district]),
        DimensionElementDto::new(0, "Тестовая область 1")
            .with_path(path)
            .with_attribute(attr::CODE, "991"),
        DimensionElementDto::new(0, "Тестовая область 2")
            .with_path(path)
            .with_attribute(attr::CODE, "992"),
    ];

    suite
        .create_scenario()?
        .create_verify_cleanup(Role::Admin, REGIONS, &created, &expected)
        .await?
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_create_without_required_code_is_rejected() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let client = suite.scenario()?.client_as(Role::Admin).await?;

    let outcome = client
        .dimensions()
        .create_elements(
            REGIONS,
            &[CreateElementDto::new("Без кода").in_folder([data::RUSSIA, data::VOLGA])],
        )
        .await;

    match outcome {
        Ok(result) => {
            suite
                .create_scenario()?
                .cleanup(REGIONS, &result.created_ids)
                .await?;
            assert!(result.created_ids.is_empty(), "element was created");
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].index, Some(0));
            assert!(result.errors[0].message.contains(messages::REQUIRED));
        }
        Err(e) => assert!(e.mentions(messages::REQUIRED), "unexpected error: {}", e),
    }
    Ok(())
}
