pub mod macros;

pub mod adyen;
pub use self::adyen::Adyen;

pub mod nmi;
pub use self::nmi::Nmi;

pub mod square;
pub use self::square::Square;

pub mod stax;
pub use self::stax::Stax;

pub mod worldpay;
pub use self::worldpay::Worldpay;
