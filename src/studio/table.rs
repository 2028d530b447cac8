// Atelier Template Table
//
// The fixed (category, operation) -> instruction template mapping.
// Operation keys are the short labels users pick from; templates are the
// full English instructions handed to the diffusion backend. Populated at
// startup, never mutated at runtime.

use crate::studio::templates::{Category, TemplateEntry};

macro_rules! entries {
    ($(($key:expr, $template:expr)),* $(,)?) => {
        vec![$(TemplateEntry { key: $key, template: $template }),*]
    };
}

pub fn build() -> Vec<(Category, Vec<TemplateEntry>)> {
    vec![
        (
            Category::Perspective,
            entries![
                ("从正面看", "Change the view to front view, clear and detailed"),
                ("从侧面看", "Change the view to side view, clear and detailed"),
                ("从背面看", "Change the view to back view, clear and detailed"),
                ("从上往下看", "Change the view to top-down view, bird's eye view"),
                ("从下往上看", "Change the view to bottom-up view, low angle view"),
                ("俯视图", "Convert to aerial view, overhead perspective"),
                ("仰视图", "Convert to upward view, worm's eye view"),
            ],
        ),
        (
            Category::Style,
            entries![
                ("油画风格", "Convert to oil painting style, artistic brush strokes"),
                ("水彩风格", "Convert to watercolor style, soft and flowing"),
                ("素描风格", "Convert to pencil sketch style, black and white drawing"),
                ("动漫风格", "Convert to anime style, manga artwork"),
                ("照片风格", "Convert to photorealistic style, highly detailed"),
                ("印象派", "Convert to impressionist painting style"),
                ("抽象艺术", "Convert to abstract art style"),
            ],
        ),
        (
            Category::Environment,
            entries![
                ("白天转夜晚", "Change from day to night, add moonlight and stars"),
                ("夜晚转白天", "Change from night to day, add bright sunlight"),
                ("晴天转雨天", "Change to rainy weather, add rain drops and clouds"),
                ("室内转室外", "Move the scene from indoor to outdoor setting"),
                ("现代转古代", "Change the setting from modern to ancient times"),
                ("城市转乡村", "Change the setting from city to countryside"),
                ("春天转秋天", "Change the season from spring to autumn"),
            ],
        ),
        (
            Category::ObjectAttribute,
            entries![
                ("改变颜色", "Change the color to {color}"),
                ("改变材质", "Change the material to {material}"),
                ("改变大小", "Change the size to {size}"),
                ("添加装饰", "Add decorative elements like {decoration}"),
                ("改变表情", "Change the facial expression to {expression}"),
                ("改变姿态", "Change the pose to {pose}"),
                ("改变服装", "Change the clothing to {clothing}"),
            ],
        ),
        (
            Category::Avatar,
            entries![
                ("生成3D虚拟人", "Generate a 3D virtual avatar, realistic human appearance"),
                ("卡通角色", "Create cartoon character avatar, stylized and cute"),
                ("动漫人物", "Generate anime character, manga style illustration"),
                ("游戏角色", "Create game character design, fantasy RPG style"),
                ("商务形象", "Generate professional business avatar, formal appearance"),
                ("时尚模特", "Create fashion model avatar, trendy and stylish"),
            ],
        ),
        (
            Category::Removal,
            entries![
                ("移除对象", "Remove the {object} from the image completely"),
                ("消除水印", "Remove watermarks and logos from the image"),
                ("清除背景", "Remove background, make it transparent or solid color"),
                ("去除文字", "Remove all text and writing from the image"),
                ("消除瑕疵", "Remove imperfections, spots, and blemishes"),
                ("删除人物", "Remove people from the image"),
            ],
        ),
        (
            Category::Redraw,
            entries![
                ("局部重绘", "Redraw the selected area with {description}"),
                ("背景重绘", "Redraw the background as {background}"),
                ("人物重绘", "Redraw the person with {features}"),
                ("物体重绘", "Redraw the object as {new_object}"),
                ("全图重绘", "Completely redraw the image in {style} style"),
                ("细节重绘", "Enhance and redraw fine details"),
            ],
        ),
        (
            Category::Scene,
            entries![
                ("科幻场景", "Transform into futuristic sci-fi environment"),
                ("奇幻世界", "Create fantasy world with magical elements"),
                ("历史场景", "Transform into historical setting of {period}"),
                ("自然风光", "Create natural landscape scene with {elements}"),
                ("城市场景", "Generate urban cityscape environment"),
                ("室内空间", "Create interior space design for {room_type}"),
            ],
        ),
        (
            Category::Outfit,
            entries![
                ("换装试衣", "Change clothing to {clothing_style}"),
                ("配饰搭配", "Add accessories like {accessories}"),
                ("发型变换", "Change hairstyle to {hairstyle}"),
                ("妆容调整", "Adjust makeup style to {makeup_style}"),
                ("颜色搭配", "Change color scheme to {color_theme}"),
                ("季节穿搭", "Change outfit for {season} season"),
            ],
        ),
        (
            Category::TextDesign,
            entries![
                ("艺术字体", "Add artistic text '{text}' with {font_style} style"),
                ("标题设计", "Design title text '{title}' with professional layout"),
                ("logo设计", "Create logo design with text '{logo_text}'"),
                ("书法字体", "Add calligraphy text '{text}' in {calligraphy_style}"),
                ("立体文字", "Create 3D text effect for '{text}'"),
                ("霓虹文字", "Add neon light text effect for '{text}'"),
            ],
        ),
        (
            Category::Poster,
            entries![
                ("电影海报", "Design movie poster style with {theme}"),
                ("音乐海报", "Create music concert poster design"),
                ("活动海报", "Design event poster for {event_type}"),
                ("产品海报", "Create product advertisement poster"),
                ("复古海报", "Design vintage poster style with retro elements"),
                ("简约海报", "Create minimalist poster design"),
            ],
        ),
    ]
}
