// Live tests for measure group rows.
// Marked with #[ignore]: they need a deployed service with the acceptance dump.

use anyhow::Result;
use datacollect_acceptance::data::{self, messages, product_ids, region_ids, sales};
use datacollect_acceptance::scenario::routes;
use datacollect_acceptance::{PathParams, Role, SuiteFixture, UrlTemplate};
use datacollect_core::{
    CreateMeasureElementDto, HasErrors, MatchBy, MeasureElementDto, MeasureElementsVerifier,
    SearchRequest, SimpleFilter, UpdateMeasureElementDto, VerifyOptions,
};
use datacollect_sdk::{Method, StatusCode};
use pretty_assertions::assert_eq;

const SALES: i64 = data::SALES_MEASURE_GROUP_ID;

fn year_2021() -> SearchRequest {
    SearchRequest::new().filter(SimpleFilter::equal(sales::YEAR, 2021))
}

#[tokio::test]
#[ignore]
async fn test_sales_measure_group_metadata() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let client = suite.scenario()?.client_as(Role::Viewer).await?;

    let group = client.measure_groups().get(SALES).await?;

    assert_eq!(group.name, "Продажи");
    assert_eq!(group.dimensions, vec![sales::REGION, sales::PRODUCT, sales::YEAR]);
    assert!(group.measure(sales::REVENUE).is_some());
    assert!(group.measure(sales::QUANTITY).is_some());
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_rows_of_year() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let client = suite.scenario()?.client_as(Role::Viewer).await?;

    let actual = client.measure_groups().search_elements(SALES, &year_2021()).await?;

    MeasureElementsVerifier::default()
        .verify(&actual, &data::sales_2021())
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_rows_by_measure_value() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let client = suite.scenario()?.client_as(Role::Viewer).await?;
    let request = year_2021().filter(SimpleFilter::greater_or_equal(sales::REVENUE, 500_000.0));

    let actual = client.measure_groups().search_elements(SALES, &request).await?;

    let expected: Vec<MeasureElementDto> = data::sales_2021()
        .into_iter()
        .filter(|row| row.coordinates[sales::REGION] == region_ids::MOSCOW)
        .collect();
    MeasureElementsVerifier::new(VerifyOptions::new().match_by(MatchBy::Name))
        .verify(&actual, &expected)
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_rows_through_template() -> Result<()> {
    let suite = SuiteFixture::global().await?;

    let actual: Vec<MeasureElementDto> = suite
        .scenario()?
        .call_json(
            Role::Viewer,
            Method::POST,
            &UrlTemplate::new(routes::MEASURE_GROUP_ELEMENTS_SEARCH),
            &PathParams::new().set("measureGroupId", SALES),
            Some(
                &year_2021().filter(SimpleFilter::equal(sales::PRODUCT, product_ids::CHEESE)),
            ),
        )
        .await?;

    assert_eq!(actual.len(), 1);
    assert_eq!(
        actual[0].coordinate_key(),
        format!(
            "{}=2021;{}={};{}={}",
            sales::YEAR,
            sales::REGION,
            region_ids::NIZHNY_NOVGOROD,
            sales::PRODUCT,
            product_ids::CHEESE
        )
    );
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_update_measure_value_and_restore() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let admin = suite.scenario()?.client_as(Role::Admin).await?;
    let original = data::sales_2021().remove(0);
    let changed = original.clone().with_value(sales::REVENUE, 1_800_000.25);

    let result = admin
        .measure_groups()
        .update_elements(
            SALES,
            &[UpdateMeasureElementDto::new(original.id).with_value(sales::REVENUE, 1_800_000.25)],
        )
        .await?;
    let actual = admin.measure_groups().search_elements(SALES, &year_2021()).await;

    let restore = admin
        .measure_groups()
        .update_elements(
            SALES,
            &[UpdateMeasureElementDto::new(original.id)
                .with_value(sales::REVENUE, original.value(sales::REVENUE).cloned())],
        )
        .await?;
    assert!(restore.is_success(), "restore failed: {:?}", restore.errors);

    assert!(result.is_success(), "{:?}", result.error_messages());
    MeasureElementsVerifier::new(VerifyOptions::new().allow_extra())
        .verify(&actual?, &[changed])
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_create_row_with_unknown_coordinate_is_rejected() -> Result<()> {
    let suite = SuiteFixture::global().await?;
    let body = vec![CreateMeasureElementDto::new()
        .with_coordinate(sales::REGION, data::MISSING_ID)
        .with_coordinate(sales::PRODUCT, product_ids::MILK)
        .with_coordinate(sales::YEAR, 2021)
        .with_value(sales::REVENUE, 1.0)];

    suite
        .scenario()?
        .expect_error(
            Role::Admin,
            Method::POST,
            &UrlTemplate::new(routes::MEASURE_GROUP_ELEMENTS),
            &PathParams::new().set("measureGroupId", SALES),
            Some(&body),
            StatusCode::BAD_REQUEST,
            messages::NOT_FOUND,
        )
        .await?;
    Ok(())
}
