//! Canonical catalog service names for common search hints.

/// Hint → canonical service name. Process-wide, read-only.
///
/// Keys are lowercase; lookups normalize the hint before matching.
pub const SERVICE_MAPPINGS: &[(&str, &str)] = &[
    ("app service", "Azure App Service"),
    ("web app", "Azure App Service"),
    ("web apps", "Azure App Service"),
    ("app services", "Azure App Service"),
    ("websites", "Azure App Service"),
    ("web service", "Azure App Service"),
    ("virtual machine", "Virtual Machines"),
    ("vm", "Virtual Machines"),
    ("vms", "Virtual Machines"),
    ("compute", "Virtual Machines"),
    ("storage", "Storage"),
    ("blob", "Storage"),
    ("blob storage", "Storage"),
    ("file storage", "Storage"),
    ("disk", "Storage"),
    ("sql", "Azure SQL Database"),
    ("sql database", "Azure SQL Database"),
    ("database", "Azure SQL Database"),
    ("sql server", "Azure SQL Database"),
    ("cosmos", "Azure Cosmos DB"),
    ("cosmosdb", "Azure Cosmos DB"),
    ("cosmos db", "Azure Cosmos DB"),
    ("document db", "Azure Cosmos DB"),
    ("kubernetes", "Azure Kubernetes Service"),
    ("aks", "Azure Kubernetes Service"),
    ("k8s", "Azure Kubernetes Service"),
    ("container service", "Azure Kubernetes Service"),
    ("functions", "Azure Functions"),
    ("function app", "Azure Functions"),
    ("serverless", "Azure Functions"),
    ("redis", "Azure Cache for Redis"),
    ("cache", "Azure Cache for Redis"),
    ("ai", "Azure AI services"),
    ("cognitive", "Azure AI services"),
    ("cognitive services", "Azure AI services"),
    ("openai", "Azure OpenAI"),
    ("networking", "Virtual Network"),
    ("network", "Virtual Network"),
    ("vnet", "Virtual Network"),
    ("load balancer", "Load Balancer"),
    ("lb", "Load Balancer"),
    ("application gateway", "Application Gateway"),
    ("app gateway", "Application Gateway"),
];

/// Case-insensitive exact hint lookup.
pub fn exact_lookup(hint: &str) -> Option<&'static str> {
    let hint = hint.trim().to_lowercase();
    SERVICE_MAPPINGS.iter().find(|(key, _)| *key == hint).map(|&(_, name)| name)
}

/// Canonical names whose hint key overlaps the given hint (containment in
/// either direction), deduplicated in table order.
pub fn partial_lookup(hint: &str) -> Vec<&'static str> {
    let hint = hint.trim().to_lowercase();
    if hint.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for &(key, name) in SERVICE_MAPPINGS {
        if (hint.contains(key) || key.contains(&hint)) && !matches.contains(&name) {
            matches.push(name);
        }
    }
    matches
}
