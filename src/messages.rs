//! User-facing strings. The backend catalog is Korean, so the client speaks Korean.

pub const EMPTY_FOOD_NAME: &str = "음식 이름을 입력해주세요.";
pub const NON_POSITIVE_WEIGHT: &str = "중량은 0보다 큰 값을 입력해주세요.";
pub const INVALID_WEIGHT: &str = "중량은 숫자로 입력해주세요.";
pub const CALCULATION_FAILED: &str = "영양성분 계산 중 오류가 발생했습니다.";

pub const ITEM_NOT_FOUND: &str = "해당 음식을 찾을 수 없습니다.";
pub const SERVER_ERROR: &str = "서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
pub const REQUEST_TIMEOUT: &str = "요청 시간이 초과되었습니다.";

pub const NO_HISTORY: &str = "저장된 계산 기록이 없습니다.";

pub fn food_not_found(food_name: &str) -> String {
    format!("'{food_name}' 음식을 찾을 수 없습니다. 사용 가능한 음식 목록을 확인해주세요.")
}
