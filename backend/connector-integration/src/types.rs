use domain_types::connector_types::ConnectorEnum;
use interfaces::connector_types::BoxedConnector;

use crate::connectors;

#[derive(Clone)]
pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(connector_name: &ConnectorEnum) -> Self {
        let connector = Self::convert_connector(*connector_name);
        Self {
            connector,
            connector_name: *connector_name,
        }
    }

    fn convert_connector(connector_name: ConnectorEnum) -> BoxedConnector {
        match connector_name {
            ConnectorEnum::Adyen => Box::new(connectors::Adyen::new()),
            ConnectorEnum::Nmi => Box::new(connectors::Nmi::new()),
            ConnectorEnum::Square => Box::new(connectors::Square::new()),
            ConnectorEnum::Stax => Box::new(connectors::Stax::new()),
            ConnectorEnum::Worldpay => Box::new(connectors::Worldpay::new()),
        }
    }
}

impl std::fmt::Debug for ConnectorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorData")
            .field("connector_name", &self.connector_name)
            .finish()
    }
}

pub struct ResponseRouterData<Response, RouterData> {
    pub response: Response,
    pub router_data: RouterData,
    pub http_code: u16,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_connector_resolves_to_its_adapter() {
        for name in ConnectorEnum::iter() {
            let data = ConnectorData::get_connector_by_name(&name);
            assert_eq!(data.connector.id(), name.to_string());
        }
    }
}
