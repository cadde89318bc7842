// crates/client-gateway-server/src/catalog.rs
// ============================================================================
// Module: Route Catalog
// Description: Declarative table of every HTTP route the gateway serves.
// Purpose: Drive router construction and the ownership exemption table.
// Dependencies: axum, client-gateway-broker, client-gateway-core
// ============================================================================

//! ## Overview
//! Each [`RouteSpec`] names an HTTP method, an axum route template, what the
//! route does, and whether the ownership gate skips it. The router and the
//! exemption side table are both derived from [`route_catalog`], so the two
//! can never drift apart.
//!
//! Templates use the router's `{param}` placeholder syntax. The ownership
//! gate keys exemptions by the same template string the router reports as
//! the matched path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::Method;
use client_gateway_broker::Pattern;
use client_gateway_core::RouteKey;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Where a forwarded route takes the tenant identifier from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    /// Payload is forwarded without tenant injection.
    Passthrough,
    /// The caller's tenant overrides any client-supplied value.
    Caller,
    /// The caller's tenant, else an explicit `businessId` from the request.
    CallerOrExplicit,
}

/// What a route does once the gates allow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Liveness report.
    Health,
    /// Echo the verified principal and rotated token.
    VerifyToken,
    /// Forward the request payload to a backend handler.
    Forward {
        /// Backend message pattern.
        pattern: Pattern,
        /// Tenant injection rule.
        tenant: TenantSource,
        /// Route parameters forwarded as integers.
        numeric_params: &'static [&'static str],
    },
}

/// One routed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// HTTP method.
    pub method: Method,
    /// Router template (`/api/orders/{businessId}`).
    pub template: &'static str,
    /// Handler behavior.
    pub action: RouteAction,
    /// True when the ownership gate skips this route.
    pub ownership_exempt: bool,
}

impl RouteSpec {
    /// Returns the route identifier used by the ownership gate.
    #[must_use]
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.method.as_str(), self.template)
    }

    /// Returns a copy whose named route parameters forward as integers.
    fn numeric(mut self, names: &'static [&'static str]) -> Self {
        if let RouteAction::Forward {
            numeric_params,
            ..
        } = &mut self.action
        {
            *numeric_params = names;
        }
        self
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Builds a forwarding route on a topic pattern.
fn topic(
    method: Method,
    template: &'static str,
    name: &str,
    tenant: TenantSource,
    ownership_exempt: bool,
) -> RouteSpec {
    RouteSpec {
        method,
        template,
        action: RouteAction::Forward {
            pattern: Pattern::topic(name),
            tenant,
            numeric_params: &[],
        },
        ownership_exempt,
    }
}

/// Builds a forwarding route on a command pattern.
fn command(
    method: Method,
    template: &'static str,
    name: &str,
    tenant: TenantSource,
    ownership_exempt: bool,
) -> RouteSpec {
    RouteSpec {
        method,
        template,
        action: RouteAction::Forward {
            pattern: Pattern::command(name),
            tenant,
            numeric_params: &[],
        },
        ownership_exempt,
    }
}

/// Returns every route served by the gateway.
#[must_use]
pub fn route_catalog() -> Vec<RouteSpec> {
    use TenantSource::Caller;
    use TenantSource::CallerOrExplicit;
    use TenantSource::Passthrough;
    const ID: &[&str] = &["id"];

    let mut routes = vec![
        RouteSpec {
            method: Method::GET,
            template: "/",
            action: RouteAction::Health,
            ownership_exempt: true,
        },
        RouteSpec {
            method: Method::GET,
            template: "/api",
            action: RouteAction::Health,
            ownership_exempt: true,
        },
        RouteSpec {
            method: Method::GET,
            template: "/api/auth/verify",
            action: RouteAction::VerifyToken,
            ownership_exempt: true,
        },
    ];

    // Authentication service.
    routes.extend([
        topic(
            Method::POST,
            "/api/auth/register/business",
            "auth.register.business",
            Passthrough,
            true,
        ),
        topic(
            Method::POST,
            "/api/auth/register/employee",
            "auth.register.employee",
            Passthrough,
            false,
        ),
        topic(Method::POST, "/api/auth/login", "auth.login.user", Passthrough, true),
        topic(Method::GET, "/api/auth/modules", "auth.get.modules", Passthrough, true),
        topic(Method::POST, "/api/auth/modules/seed", "auth.seed.modules", Passthrough, true),
        topic(
            Method::GET,
            "/api/auth/business/{businessId}",
            "auth.get.business",
            Passthrough,
            false,
        ),
        topic(
            Method::GET,
            "/api/auth/employees/business/{businessId}",
            "auth.get.employees.by.business",
            Passthrough,
            false,
        ),
    ]);

    // Products.
    routes.extend([
        command(Method::POST, "/api/products", "create_product", Caller, false),
        command(Method::GET, "/api/products", "find_all_products", CallerOrExplicit, true),
        command(
            Method::GET,
            "/api/products/top-selling",
            "find_top_selling_products",
            CallerOrExplicit,
            true,
        ),
        command(Method::GET, "/api/products/{id}", "find_one_product", CallerOrExplicit, true)
            .numeric(ID),
        command(Method::PATCH, "/api/products/{id}", "update_product", Caller, true).numeric(ID),
        command(Method::DELETE, "/api/products/{id}", "delete_product", Caller, true).numeric(ID),
    ]);

    // Categories.
    routes.extend([
        command(Method::POST, "/api/categories", "create_category", Caller, false),
        command(Method::GET, "/api/categories", "find_all_categories", CallerOrExplicit, true),
        command(Method::GET, "/api/categories/{id}", "find_one_category", CallerOrExplicit, true)
            .numeric(ID),
        command(Method::PATCH, "/api/categories/{id}", "update_category", Caller, true).numeric(ID),
        command(Method::DELETE, "/api/categories/{id}", "delete_category", Caller, true)
            .numeric(ID),
        command(
            Method::GET,
            "/api/categories/admin/all",
            "find_all_categories_including_deleted",
            Caller,
            false,
        ),
        command(Method::PUT, "/api/categories/{id}/restore", "restore_category", Caller, true)
            .numeric(ID),
    ]);

    // Orders and tables.
    routes.extend([
        topic(Method::POST, "/api/orders", "createOrder", Passthrough, true),
        topic(Method::POST, "/api/orders/pos", "createOrderWithStatus", Caller, false),
        topic(Method::GET, "/api/orders/{businessId}", "findAllOrders", Passthrough, false),
        topic(
            Method::GET,
            "/api/orders/kitchen/{businessId}",
            "findKitchenOrders",
            Passthrough,
            false,
        ),
        topic(Method::GET, "/api/orders/{businessId}/{id}", "findOneOrder", Passthrough, false)
            .numeric(ID),
        topic(
            Method::GET,
            "/api/orders/{businessId}/paid-order-by-table/{tableId}",
            "findPaidOrderByTableId",
            Passthrough,
            true,
        ),
        topic(
            Method::GET,
            "/api/orders/{businessId}/order-position-by-table/{tableId}",
            "getOrderPositionByTableId",
            Passthrough,
            true,
        ),
        topic(
            Method::PATCH,
            "/api/orders/{businessId}/order/{id}",
            "changeOrderStatus",
            Passthrough,
            false,
        )
        .numeric(ID),
        topic(
            Method::PATCH,
            "/api/orders/{businessId}/order/{id}/delivered",
            "markOrderAsDelivered",
            Passthrough,
            false,
        )
        .numeric(ID),
        topic(
            Method::GET,
            "/api/tables/{businessId}/{tableId}",
            "findTableById",
            Passthrough,
            false,
        ),
    ]);

    // Roles.
    routes.extend([
        topic(Method::POST, "/api/roles", "roles.create", Caller, true),
        topic(
            Method::POST,
            "/api/roles/defaults/{businessId}",
            "roles.createDefaults",
            Passthrough,
            false,
        ),
        topic(Method::POST, "/api/roles/assign", "roles.assign", Caller, true),
        topic(Method::GET, "/api/roles", "roles.findAll", Caller, true),
        topic(Method::GET, "/api/roles/{roleId}", "roles.findOne", Caller, true),
        topic(Method::PATCH, "/api/roles/{roleId}", "roles.update", Caller, true),
        topic(Method::DELETE, "/api/roles/{roleId}", "roles.remove", Caller, true),
    ]);

    // Storefront customization and themes.
    routes.extend([
        command(Method::POST, "/api/customization", "create_ui_configuration", Caller, false),
        command(Method::PATCH, "/api/customization", "update_ui_configuration", Caller, false),
        command(Method::DELETE, "/api/customization", "delete_ui_configuration", Caller, false),
        command(
            Method::GET,
            "/api/customization/{businessId}",
            "find_ui_configuration_by_business",
            CallerOrExplicit,
            true,
        ),
        command(Method::GET, "/api/customization/themes", "find_all_themes", Passthrough, false),
        command(
            Method::GET,
            "/api/customization/themes/{id}",
            "find_theme_by_id",
            Passthrough,
            false,
        )
        .numeric(ID),
        command(Method::POST, "/api/customization/themes/seed", "seed_themes", Passthrough, false),
    ]);

    routes
}

/// Returns the identifiers of every ownership-exempt route.
#[must_use]
pub fn ownership_exemptions(catalog: &[RouteSpec]) -> Vec<RouteKey> {
    catalog.iter().filter(|route| route.ownership_exempt).map(RouteSpec::key).collect()
}
