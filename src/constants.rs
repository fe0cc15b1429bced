/// Mason hypermedia media type used for every API response.
pub const MASON: &str = "application/vnd.mason+json";

pub const LINK_RELATIONS_URL: &str = "/nearby/link-relations/";

pub const ERROR_PROFILE: &str = "/profiles/error/";
pub const COUNTRY_PROFILE: &str = "/profiles/country/";
pub const USER_PROFILE: &str = "/profiles/user/";
pub const AREA_PROFILE: &str = "/profiles/area/";
pub const EVENT_PROFILE: &str = "/profiles/event/";
pub const RESERVATION_PROFILE: &str = "/profiles/reservation/";
pub const TICKET_PROFILE: &str = "/profiles/ticket/";

pub const NAMESPACE: &str = "nearby";
