use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use tracing::info;

use crate::entity::{
    feature_flag, product, product_metadata, sale_category, sale_price, user,
};
use crate::utils::hash;

/// `(name, description, price in cents, image, category)`.
const BASE_PRODUCTS: &[(&str, &str, i64, &str, &str)] = &[
    (
        "Performance Profiler Pro",
        "Advanced performance monitoring tool with real-time profiling, memory leak detection, and CPU usage analysis. Perfect for optimizing your applications.",
        29999,
        "/assets/images/performanceprofiler.png",
        "Performance",
    ),
    (
        "Security Scanner Elite",
        "Comprehensive security scanning suite that identifies vulnerabilities, checks dependencies, and provides automated fixes for common security issues.",
        39999,
        "/assets/images/securityscanner.png",
        "Security",
    ),
    (
        "Unit Test Generator",
        "AI-powered unit test generation tool that creates comprehensive test suites for your codebase automatically.",
        14999,
        "/assets/images/unittestgenerator.png",
        "Testing",
    ),
    (
        "Code Coverage Reporter",
        "Detailed code coverage analysis with visual reports, branch coverage, and integration with popular CI/CD platforms.",
        19999,
        "/assets/images/codecoveragereporter.png",
        "Testing",
    ),
    (
        "API Mocking Tool",
        "Create mock APIs quickly with realistic data generation, request validation, and automatic documentation.",
        17999,
        "/assets/images/apimockingtool.png",
        "Testing",
    ),
    (
        "Docker Image Optimizer",
        "Reduce Docker image sizes by up to 80% with intelligent layer optimization and security scanning.",
        24999,
        "/assets/images/dockerimageoptimizer.png",
        "DevOps",
    ),
    (
        "GraphQL Explorer",
        "Interactive GraphQL development environment with query builder, schema visualization, and performance monitoring.",
        18999,
        "/assets/images/graphqlexplorer.png",
        "API",
    ),
    (
        "Responsive Design Tester",
        "Test your web applications across multiple devices and screen sizes simultaneously with live reload and screenshot capture.",
        9999,
        "/assets/images/responsivedesigntester.png",
        "Frontend",
    ),
    (
        "Accessibility Checker",
        "Ensure your applications meet WCAG standards with automated accessibility testing and detailed remediation suggestions.",
        14999,
        "/assets/images/accessibilitychecker.png",
        "Frontend",
    ),
    (
        "Code Complexity Analyzer",
        "Identify code smells, measure complexity metrics, and get actionable refactoring suggestions.",
        16999,
        "/assets/images/codecomplexityanalyzer.png",
        "Code Quality",
    ),
    (
        "Data Migration Assistant",
        "Simplify database migrations with automated schema diff, data validation, and rollback capabilities.",
        27999,
        "/assets/images/datamigrationassistant.png",
        "Database",
    ),
    (
        "Error Logger Pro",
        "Advanced error tracking and logging solution with real-time alerts, stack trace analysis, and error grouping.",
        21999,
        "/assets/images/errorlogger.png",
        "Monitoring",
    ),
    (
        "Memory Leak Detector",
        "Identify and fix memory leaks in your applications with real-time memory profiling and allocation tracking.",
        25999,
        "/assets/images/memoryleak.png",
        "Performance",
    ),
    (
        "Code Formatter Elite",
        "Automatic code formatting with support for multiple languages, custom style guides, and team presets.",
        7999,
        "/assets/images/codeformatter.png",
        "Code Quality",
    ),
    (
        "Loop Guard",
        "Prevent infinite loops and detect performance bottlenecks in your code with intelligent loop analysis.",
        12999,
        "/assets/images/loopguard.png",
        "Performance",
    ),
    (
        "Syntax Shield",
        "Real-time syntax checking and error prevention with intelligent code completion and validation.",
        9999,
        "/assets/images/syntaxshield.png",
        "Code Quality",
    ),
    (
        "Undefined Variable Detector",
        "Catch undefined variables before runtime with static analysis and type checking across your entire codebase.",
        13999,
        "/assets/images/undefinedvariable.png",
        "Code Quality",
    ),
    (
        "Callback Hell Resolver",
        "Refactor callback-heavy code into clean async/await patterns with automatic promise conversion.",
        15999,
        "/assets/images/callbackhell.png",
        "Code Quality",
    ),
];

/// `(product name, sale price in cents, sale category, featured, priority)`.
const SALE_ITEMS: &[(&str, i64, &str, bool, i32)] = &[
    ("Performance Profiler Pro", 19999, "Black Friday", true, 100),
    ("Security Scanner Elite", 24999, "Black Friday", true, 95),
    ("Unit Test Generator", 8999, "Cyber Monday", true, 90),
    ("Code Coverage Reporter", 12999, "Cyber Monday", false, 85),
    ("API Mocking Tool", 11999, "Black Friday", false, 80),
    ("Docker Image Optimizer", 16999, "Cyber Monday", false, 75),
    ("GraphQL Explorer", 12999, "Black Friday", false, 70),
    ("Responsive Design Tester", 5999, "Cyber Monday", false, 65),
    ("Accessibility Checker", 9999, "Black Friday", false, 60),
    ("Code Complexity Analyzer", 10999, "Cyber Monday", false, 55),
    ("Data Migration Assistant", 18999, "Black Friday", false, 50),
    ("Error Logger Pro", 14999, "Black Friday", false, 45),
    ("Memory Leak Detector", 17999, "Cyber Monday", false, 40),
];

/// `(name, description, start (y, m, d), end (y, m, d))`.
const SALE_CATEGORIES: &[(&str, &str, (i32, u32, u32), (i32, u32, u32))] = &[
    (
        "Black Friday",
        "Exclusive Black Friday deals",
        (2024, 11, 29),
        (2024, 11, 30),
    ),
    (
        "Cyber Monday",
        "Amazing Cyber Monday savings",
        (2024, 12, 2),
        (2024, 12, 3),
    ),
];

/// `(name, default value, description)`.
const DEFAULT_FLAGS: &[(&str, bool, &str)] = &[
    (
        "STORE_CHECKOUT_ENABLED",
        true,
        "Allow customers to check out from the store",
    ),
    ("MAIN_STORE", true, "Show the main storefront"),
    ("SITE_RELAUNCH", false, "Show the relaunched site design"),
    ("BACKEND_V2", true, "Route storefront calls to the v2 backend"),
    ("UNBORKED_V2", false, "Enable the v2 storefront experience"),
    (
        "EXPERIMENTAL_CHECKOUT",
        false,
        "Use the experimental checkout flow",
    ),
    ("DARK_MODE", false, "Dark colour scheme"),
    (
        "ADVANCED_FILTERING",
        false,
        "Extra filters on the product listing",
    ),
];

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";

/// Percentage saved, rounded to two places.
pub fn discount_percent(price: Decimal, sale_price: Decimal) -> Decimal {
    if price.is_zero() {
        return Decimal::ZERO;
    }
    ((price - sale_price) / price * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Seed sale categories, products and their sale data.
///
/// Skipped when the catalog already has products, so restarts do not
/// duplicate rows.
pub async fn seed_catalog(db: &DatabaseConnection) -> Result<(), DbErr> {
    if sale_category::Entity::find().count(db).await? == 0 {
        for &(name, description, start, end) in SALE_CATEGORIES {
            sale_category::ActiveModel {
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                start_date: Set(utc_date(start)?),
                end_date: Set(utc_date(end)?),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        info!("Seeded {} sale categories", SALE_CATEGORIES.len());
    }

    if product::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let now = Utc::now();
    let mut inserted = Vec::with_capacity(BASE_PRODUCTS.len());
    for &(name, description, cents, image, category) in BASE_PRODUCTS {
        let model = product::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(Decimal::new(cents, 2)),
            image: Set(Some(image.to_string())),
            category: Set(Some(category.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted.push(model);
    }
    info!("Seeded {} products", inserted.len());

    let mut sale_rows = 0u32;
    for &(name, sale_cents, category, featured, priority) in SALE_ITEMS {
        let sale = Decimal::new(sale_cents, 2);
        for product in inserted.iter().filter(|p| p.name == name) {
            sale_price::ActiveModel {
                product_id: Set(product.id),
                sale_price: Set(sale),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;

            product_metadata::ActiveModel {
                product_id: Set(product.id),
                discount: Set(Some(discount_percent(product.price, sale))),
                sale_category: Set(Some(category.to_string())),
                featured: Set(Some(featured)),
                priority: Set(Some(priority)),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            sale_rows += 1;
        }
    }
    info!("Seeded sale data for {} products", sale_rows);

    Ok(())
}

fn utc_date((year, month, day): (i32, u32, u32)) -> Result<chrono::DateTime<Utc>, DbErr> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| DbErr::Custom(format!("invalid seed date {year}-{month}-{day}")))
}

/// Create the demo account if it does not exist yet.
pub async fn seed_demo_user(db: &DatabaseConnection) -> Result<(), DbErr> {
    let password = hash::hash_password(DEMO_PASSWORD)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {}", e)))?;

    let now = Utc::now();
    let model = user::ActiveModel {
        username: Set(DEMO_USERNAME.to_string()),
        password: Set(password),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = user::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => {}
        Ok(_) => info!("Seeded demo user '{}'", DEMO_USERNAME),
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Seed the default feature flags, leaving existing values alone.
pub async fn seed_flags(db: &DatabaseConnection, actor: &str) -> Result<(), DbErr> {
    let now = Utc::now();
    let mut inserted = 0u32;
    for &(name, value, description) in DEFAULT_FLAGS {
        let model = feature_flag::ActiveModel {
            name: Set(name.to_string()),
            value: Set(value),
            description: Set(Some(description.to_string())),
            last_updated_by: Set(Some(actor.to_string())),
            last_updated_at: Set(now),
            created_at: Set(now),
            ..Default::default()
        };

        let result = feature_flag::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(feature_flag::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) => inserted += n as u32,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new feature flags", inserted);
    }

    Ok(())
}
