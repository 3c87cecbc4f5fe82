// Server-push notifications delivered over the event stream

/// A single event-name token received from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    CustomerCreated,
    ProductCreated,
    OrderCreated,
    Unknown(String),
}

impl PushEvent {
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "customer_created" => Self::CustomerCreated,
            "product_created" => Self::ProductCreated,
            "order_created" => Self::OrderCreated,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<&str> for PushEvent {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tokens() {
        assert_eq!(PushEvent::parse("customer_created"), PushEvent::CustomerCreated);
        assert_eq!(PushEvent::parse("product_created"), PushEvent::ProductCreated);
        assert_eq!(PushEvent::parse(" order_created\n"), PushEvent::OrderCreated);
    }

    #[test]
    fn test_parse_unknown_token() {
        assert_eq!(
            PushEvent::from("inventory_changed"),
            PushEvent::Unknown("inventory_changed".to_string())
        );
        assert_eq!(
            PushEvent::parse("Customer_Created"),
            PushEvent::Unknown("Customer_Created".to_string())
        );
    }
}
