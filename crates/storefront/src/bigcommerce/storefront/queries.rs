//! GraphQL document definitions for the BigCommerce storefront API.

use graphql_client::GraphQLQuery;

// Category tree, three levels deep
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/categories.graphql",
    response_derives = "Debug, Clone, Serialize"
)]
pub struct GetCategoryTree;

// Customer session queries and mutations
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/customer.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetCustomerId;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/customer.graphql",
    response_derives = "Debug, Clone"
)]
pub struct Login;
