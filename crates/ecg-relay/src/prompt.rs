//! The fixed instruction sent to the model alongside the images.

/// Prompt for a single ECG image.
pub const SINGLE_IMAGE_PROMPT: &str = "This is an ECG analysis request. Please analyze this \
ECG image in detail and provide a professional medical interpretation including:\n\n\
1. Heart rate and rhythm assessment\n\
2. Identification of any abnormalities\n\
3. P-wave, QRS complex, and T-wave analysis\n\
4. Potential clinical significance\n\n\
Organize your response clearly with sections and bullet points where appropriate.";

/// Prompt for several images that together form one strip.
pub const MULTI_IMAGE_PROMPT: &str = "This is an ECG analysis request. You will be provided \
with one or more images that collectively represent a continuous ECG strip. Please analyze \
these images in detail, considering that there might be overlaps between consecutive images. \
Provide a professional medical interpretation including:\n\n\
1. Heart rate and rhythm assessment\n\
2. Identification of any abnormalities\n\
3. P-wave, QRS complex, and T-wave analysis\n\
4. Potential clinical significance\n\n\
Organize your response clearly with sections and bullet points where appropriate.";

/// Picks the prompt for a request carrying `image_count` images.
pub fn for_image_count(image_count: usize) -> &'static str {
    if image_count > 1 {
        MULTI_IMAGE_PROMPT
    } else {
        SINGLE_IMAGE_PROMPT
    }
}
